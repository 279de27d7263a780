//! Menu builder.
//!
//! Collects layout, bindings, indicators and initial content, then validates
//! and compiles them in [`MenuBuilder::build`]. Nothing is bound or rendered
//! until `build` succeeds.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::signal;
use tracing::{debug, warn};

use super::{Menu, MenuCore, MenuState};
use crate::config::MenuSpec;
use crate::engine::{ElementRef, MenuRegistry, ScrollWindow, SlotTable, allocate_id};
use crate::error::{MenuError, Result};
use crate::layout::Layout;
use crate::renderer::{GridSurface, Surface};
use crate::types::Indicator;

#[derive(Default)]
pub struct MenuBuilder {
    layout: Option<Layout>,
    title: Option<String>,
    registry: Option<MenuRegistry>,
    bindings: HashMap<char, ElementRef>,
    indicators: HashMap<Indicator, char>,
    content: Vec<Option<ElementRef>>,
    surface: Option<Box<dyn Surface>>,
}

impl MenuBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from a declarative spec. Elements are still bound in code.
    pub fn from_spec(spec: &MenuSpec) -> Result<Self> {
        let mut builder = Self::new().with_layout(&spec.layout.to_layout_string())?;
        if let Some(title) = &spec.title {
            builder = builder.with_title(title.clone());
        }
        if let Some(c) = spec.content_region {
            builder = builder.bind_indicator(c, Indicator::ContentRegion)?;
        }
        Ok(builder)
    }

    /// Parse and set the layout. Line breaks are stripped.
    pub fn with_layout(mut self, raw: &str) -> Result<Self> {
        self.layout = Some(Layout::parse(raw)?);
        Ok(self)
    }

    /// Bind `element` to every slot showing `c`. A later call for the same
    /// character replaces the earlier one.
    pub fn bind_character(mut self, c: char, element: ElementRef) -> Self {
        self.bindings.insert(c, element);
        self
    }

    /// Mark the slots of `c` as managed by `indicator`.
    ///
    /// Fails with [`MenuError::DuplicateIndicator`] if another character
    /// already carries it; earlier bindings stay intact.
    pub fn bind_indicator(mut self, c: char, indicator: Indicator) -> Result<Self> {
        match self.indicators.get(&indicator) {
            Some(&existing) if existing != c => Err(MenuError::DuplicateIndicator { indicator, existing }),
            _ => {
                self.indicators.insert(indicator, c);
                Ok(self)
            }
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_registry(mut self, registry: &MenuRegistry) -> Self {
        self.registry = Some(registry.clone());
        self
    }

    /// Initial backing list of the content region.
    pub fn with_content<I>(mut self, content: I) -> Self
    where
        I: IntoIterator<Item = Option<ElementRef>>,
    {
        self.content = content.into_iter().collect();
        self
    }

    /// Render into `surface` instead of an in-memory grid.
    pub fn with_surface<S: Surface + 'static>(mut self, surface: S) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Validate, compile, render, bind every element and register the menu.
    pub fn build(self) -> Result<Menu> {
        let layout = self.layout.ok_or(MenuError::Incomplete("layout"))?;
        let registry = self.registry.ok_or(MenuError::Incomplete("registry"))?;
        let scrollable = self.indicators.contains_key(&Indicator::ContentRegion);

        for (&c, element) in &self.bindings {
            if element.is_bound() {
                return Err(MenuError::AlreadyBound);
            }
            if element.scroll_step().is_some() && !scrollable {
                return Err(MenuError::NoScrollWindow(c));
            }
        }
        let content = if scrollable {
            if self.content.iter().flatten().any(|element| element.is_bound()) {
                return Err(MenuError::AlreadyBound);
            }
            self.content
        } else {
            if !self.content.is_empty() {
                warn!(len = self.content.len(), "content ignored: no content region");
            }
            Vec::new()
        };

        let rows = layout.rows();
        let mut surface = self.surface.unwrap_or_else(|| Box::new(GridSurface::new(rows)));
        let mut table = SlotTable::compile(layout, self.bindings, self.indicators, surface.as_mut())?;
        let window = scrollable.then(|| {
            let window = ScrollWindow::new(content);
            window.fill(&mut table, surface.as_mut());
            window
        });

        let elements: Vec<ElementRef> = table
            .bindings()
            .map(|(_, element)| element.clone())
            .chain(window.iter().flat_map(|window| window.content().iter().flatten().cloned()))
            .collect();

        let menu = Menu::from_core(Rc::new(MenuCore {
            id: allocate_id(),
            title: self.title,
            offset: scrollable.then(|| signal(0)),
            state: RefCell::new(MenuState { table, window, surface }),
        }));
        let handle = menu.handle();
        for element in &elements {
            element.bind(&handle)?;
        }
        registry.register(&menu);
        debug!(id = %menu.id(), ?rows, scrollable, "menu built");
        Ok(menu)
    }
}
