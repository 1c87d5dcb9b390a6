//! Line-oriented interactive browsing over one [`CatalogSession`].

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use catalog_core::{CatalogSession, NumericRange, ToggleOutcome};
use catalog_model::{FacetName, ItemId, SortKey};
use tracing::debug;

use crate::filters::parse_bounds;
use crate::render::{compare_table, item_detail, results_table, session_footer};
use crate::settings::DisplaySettings;

pub const HELP: &str = "\
commands:
  search <text>          filter by free text (empty clears)
  facet <name> <value>   choose a facet value (toggles on multi-select facets)
  any <name>             drop the constraint on a facet
  range <name> <a..b>    constrain a numeric facet; `..` clears
  sort <key>             featured, price-high-to-low, price-low-to-high,
                         newest, largest, recently-listed
  clear                  clear every filter
  list                   show the visible results again
  more                   reveal the next page
  wish <id>              toggle an item on the wishlist
  cmp <id>               toggle an item in the compare set
  compare                show the compare set side by side
  open <id>              quick view of one item
  close                  close the quick view
  link [link]            print the compare link, or apply one
  help                   show this help
  quit                   leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    Search(String),
    Facet { name: FacetName, value: String },
    Any(FacetName),
    Range { name: FacetName, range: NumericRange },
    Sort(SortKey),
    Clear,
    List,
    More,
    Wish(ItemId),
    Cmp(ItemId),
    Compare,
    Open(ItemId),
    Close,
    Link(Option<String>),
    Help,
    Quit,
}

impl BrowseCommand {
    /// Parse one line. `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        let command = match verb.to_lowercase().as_str() {
            "search" | "s" => Self::Search(rest.to_string()),
            "facet" | "f" => {
                let (name, value) = two_args(rest, "facet <name> <value>")?;
                Self::Facet {
                    name: FacetName::new(name)?,
                    value: value.to_string(),
                }
            }
            "any" => Self::Any(FacetName::new(one_arg(rest, "any <name>")?)?),
            "range" | "r" => {
                let (name, bounds) = two_args(rest, "range <name> <min..max>")?;
                Self::Range {
                    name: FacetName::new(name)?,
                    range: parse_bounds(bounds)?,
                }
            }
            "sort" => Self::Sort(one_arg(rest, "sort <key>")?.parse()?),
            "clear" => Self::Clear,
            "list" | "ls" => Self::List,
            "more" | "m" => Self::More,
            "wish" | "w" => Self::Wish(item_id(rest, "wish <id>")?),
            "cmp" | "c" => Self::Cmp(item_id(rest, "cmp <id>")?),
            "compare" => Self::Compare,
            "open" | "o" => Self::Open(item_id(rest, "open <id>")?),
            "close" => Self::Close,
            "link" => Self::Link((!rest.is_empty()).then(|| rest.to_string())),
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("unknown command {other:?} (try `help`)"),
        };
        Ok(Some(command))
    }
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one command against `session`, writing its output to `out`.
pub fn execute(
    session: &mut CatalogSession,
    command: BrowseCommand,
    display: &DisplaySettings,
    out: &mut impl Write,
) -> Result<Flow> {
    debug!(?command, "browse command");
    match command {
        BrowseCommand::Search(query) => {
            session.set_query(&query);
            write_results(session, display, out)?;
        }
        BrowseCommand::Facet { name, value } => {
            if session.schema().facet(&name).is_none() {
                writeln!(out, "note: {name} is not a declared facet")?;
            }
            session.choose(&name, &value);
            write_results(session, display, out)?;
        }
        BrowseCommand::Any(name) => {
            session.select_any(&name);
            write_results(session, display, out)?;
        }
        BrowseCommand::Range { name, range } => {
            session.set_range(&name, range);
            write_results(session, display, out)?;
        }
        BrowseCommand::Sort(sort) => {
            session.set_sort(sort);
            writeln!(out, "sorted by {}", sort.display_name())?;
            write_results(session, display, out)?;
        }
        BrowseCommand::Clear => {
            session.clear_filters();
            write_results(session, display, out)?;
        }
        BrowseCommand::List => write_results(session, display, out)?,
        BrowseCommand::More => {
            if session.load_more() {
                write_results(session, display, out)?;
            } else {
                writeln!(out, "{}", session_footer(session))?;
            }
        }
        BrowseCommand::Wish(id) => {
            let message = match session.toggle_wishlist(&id) {
                Some(ToggleOutcome::Added) => format!("added {id} to the wishlist"),
                Some(ToggleOutcome::Removed) => format!("removed {id} from the wishlist"),
                Some(ToggleOutcome::Rejected) | None => format!("unknown item {id}"),
            };
            writeln!(out, "{message}")?;
        }
        BrowseCommand::Cmp(id) => {
            let message = match session.toggle_compare(&id) {
                Some(ToggleOutcome::Added) => format!("comparing {id}"),
                Some(ToggleOutcome::Removed) => format!("stopped comparing {id}"),
                Some(ToggleOutcome::Rejected) => {
                    format!("compare is full; remove an item before adding {id}")
                }
                None => format!("unknown item {id}"),
            };
            writeln!(out, "{message}")?;
        }
        BrowseCommand::Compare => write_compare(session, display, out)?,
        BrowseCommand::Open(id) => {
            if session.inspect(&id) {
                if let Some(item) = session.quick_view() {
                    writeln!(out, "{}", item_detail(item, display))?;
                }
            } else {
                writeln!(out, "unknown item {id}")?;
            }
        }
        BrowseCommand::Close => {
            if !session.close_quick_view() {
                writeln!(out, "quick view is not open")?;
            }
        }
        BrowseCommand::Link(None) => writeln!(out, "{}", session.compare_link())?,
        BrowseCommand::Link(Some(raw)) => {
            let kept = session.apply_compare_link(&raw);
            writeln!(out, "compare set now holds {kept} item(s)")?;
            write_compare(session, display, out)?;
        }
        BrowseCommand::Help => writeln!(out, "{HELP}")?,
        BrowseCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Read commands from `input` until `quit` or end of input. Parse errors
/// are reported and the loop continues.
pub fn run_loop(
    session: &mut CatalogSession,
    display: &DisplaySettings,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    write_results(session, display, out)?;
    writeln!(out, "type `help` for commands")?;
    for line in input.lines() {
        let line = line.context("read command")?;
        match BrowseCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                if execute(session, command, display, out)? == Flow::Quit {
                    break;
                }
            }
            Err(error) => writeln!(out, "error: {error:#}")?,
        }
        out.flush()?;
    }
    Ok(())
}

fn write_results(
    session: &CatalogSession,
    display: &DisplaySettings,
    out: &mut impl Write,
) -> Result<()> {
    let visible = session.visible();
    if !visible.is_empty() {
        writeln!(
            out,
            "{}",
            results_table(&visible, session.wishlist(), session.compare(), display)
        )?;
    }
    writeln!(out, "{}", session_footer(session))?;
    Ok(())
}

fn write_compare(
    session: &CatalogSession,
    display: &DisplaySettings,
    out: &mut impl Write,
) -> Result<()> {
    let items = session.compared_items();
    if items.is_empty() {
        writeln!(out, "compare set is empty")?;
    } else {
        writeln!(out, "{}", compare_table(&items, session.schema(), display))?;
        writeln!(out, "{}", session.compare_link())?;
    }
    Ok(())
}

fn one_arg<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    if rest.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(rest)
}

fn two_args<'a>(rest: &'a str, usage: &str) -> Result<(&'a str, &'a str)> {
    match rest.split_once(char::is_whitespace) {
        Some((first, second)) if !second.trim().is_empty() => Ok((first, second.trim())),
        _ => bail!("usage: {usage}"),
    }
}

fn item_id(rest: &str, usage: &str) -> Result<ItemId> {
    Ok(ItemId::new(one_arg(rest, usage)?)?)
}
