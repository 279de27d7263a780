//! Scroll Menu Example - bordered six-row menu with a paged content region
//!
//! Demonstrates:
//! - Layout string with a border, a content region and two scroll controls
//! - Clicking items (mutable elements count their own clicks)
//! - Scroll controls paging one row at a time
//! - Diff flushing: only changed slots are redrawn
//!
//! Keys: `q` quits, `r` scrolls back to the start.
//!
//! Run with: RUST_LOG=slot_menu=trace cargo run --example scroll_menu 2> menu.log

use std::io::{Write, stdout};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::KeyCode;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use slot_menu::state::input::{InputEvent, disable_mouse, enable_mouse, poll_event};
use slot_menu::{Attr, Element, ElementRef, Indicator, Menu, MenuRegistry, Rows, Stack, TerminalSurface};

const LAYOUT: &str = "\
#########
#       #
#       #
#       #
#       #
###<#>###";

const ORIGIN: (u16, u16) = (2, 1);

/// Backing list: plain items with every fifth one clickable.
fn catalogue() -> slot_menu::Result<Vec<Option<ElementRef>>> {
    ('a'..='z')
        .chain('A'..='Z')
        .enumerate()
        .map(|(i, glyph)| {
            if i % 5 == 0 {
                let element = Element::mutable(Stack::new(glyph).with_attrs(Attr::BOLD), |_| {});
                let weak = std::rc::Rc::downgrade(&element);
                element.set_handler(move |event| {
                    event.cancel();
                    if let Some(element) = weak.upgrade() {
                        let display = element.display();
                        let next = display.count.saturating_add(1);
                        if let Err(err) = element.set_display(display.with_count(next).with_attrs(Attr::BOLD | Attr::GLINT)) {
                            tracing::warn!(%err, "click counter not updated");
                        }
                    }
                })?;
                Ok(Some(element))
            } else if i % 7 == 3 {
                Ok(None)
            } else {
                Ok(Some(Element::fixed(Stack::new(glyph))))
            }
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let registry = MenuRegistry::new();
    let surface = TerminalSurface::new(Rows::Six, ORIGIN);
    let menu = Menu::builder()
        .with_layout(LAYOUT)?
        .bind_character('#', Element::fixed(Stack::new('#').with_attrs(Attr::DIM)))
        .bind_character('<', Element::scroll_control(-7, Stack::labeled('<', "Previous row"))?)
        .bind_character('>', Element::scroll_control(7, Stack::labeled('>', "Next row"))?)
        .bind_indicator(' ', Indicator::ContentRegion)?
        .with_content(catalogue()?)
        .with_title("Catalogue")
        .with_surface(surface.clone())
        .with_registry(&registry)
        .build()?;

    let mut out = stdout();
    enable_raw_mode()?;
    surface.enter_fullscreen(&mut out)?;
    enable_mouse()?;

    let result = run(&menu, &registry, &surface, &mut out);

    disable_mouse()?;
    surface.exit_fullscreen(&mut out)?;
    disable_raw_mode()?;
    result
}

fn run(
    menu: &Menu,
    registry: &MenuRegistry,
    surface: &TerminalSurface,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let offset = menu.offset_signal();
    loop {
        surface.flush(out)?;
        let status = format!(
            "{}  offset {:>2}/{}  (q quit, r start)",
            menu.title().unwrap_or_default(),
            offset.as_ref().map_or(0, |offset| offset.get()),
            menu.content().len()
        );
        queue!(out, MoveTo(ORIGIN.0, ORIGIN.1 + 7), Clear(ClearType::UntilNewLine), Print(status))?;
        out.flush()?;

        match poll_event(Duration::from_millis(50), surface.origin())? {
            Some(InputEvent::Click { slot, mut event }) => {
                registry.dispatch(menu.id(), slot, &mut event);
            }
            Some(InputEvent::Key(key)) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('r') => {
                    menu.scroll_to_start();
                }
                _ => {}
            },
            Some(InputEvent::Resize(..)) => {
                surface.render_full(out)?;
            }
            _ => {}
        }
    }
}
