// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use marea_app::Quote;
use marea_print::{DocumentKind, PrintSurface, ShopProfile};
use std::path::PathBuf;

pub struct PrintRuntime<S> {
    shop: ShopProfile,
    surface: S,
}

impl<S: PrintSurface> PrintRuntime<S> {
    pub fn new(shop: ShopProfile, surface: S) -> Self {
        Self { shop, surface }
    }
}

impl<S: PrintSurface> marea_tui::AppRuntime for PrintRuntime<S> {
    fn print(&mut self, kind: DocumentKind, quote: &Quote) -> Result<PathBuf> {
        let document = marea_print::render(kind, quote, &self.shop);
        self.surface
            .present(&document)
            .with_context(|| format!("print {} for quote {}", kind.label(), quote.id))
    }
}
