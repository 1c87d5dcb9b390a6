use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use catalog_cli::browse::run_loop;
use catalog_cli::catalog_file::{Catalog, load_catalog};
use catalog_cli::filters::{parse_facet_assignment, parse_range_assignment};
use catalog_cli::render::{
    compare_table, facets_table, item_detail, results_table, session_footer,
};
use catalog_cli::settings::{Settings, render_settings, save_settings, settings_path};
use catalog_core::{BrowseOptions, CatalogSession, SelectionSet};
use catalog_model::ItemId;
use tracing::{info, info_span};

use crate::cli::{
    BrowseArgs, CompareArgs, FacetsArgs, FilterArgs, SearchArgs, SettingsArgs, ShowArgs,
};

pub fn run_search(args: &SearchArgs, settings: &Settings) -> Result<()> {
    let span = info_span!("search", catalog = %args.catalog.display());
    let _guard = span.enter();
    let catalog = load_catalog(&args.catalog)?;
    let mut session = mount(&catalog, browse_options(settings, args.page_size));
    apply_filters(&mut session, &args.filters)?;
    if let Some(link) = &args.compare {
        session.apply_compare_link(link);
    }
    for _ in 1..args.pages.get() {
        if !session.load_more() {
            break;
        }
    }
    info!(
        total = session.total(),
        visible = session.visible_ids().len(),
        "search complete"
    );

    let mut out = io::stdout().lock();
    let visible = session.visible();
    if !visible.is_empty() {
        writeln!(
            out,
            "{}",
            results_table(
                &visible,
                session.wishlist(),
                session.compare(),
                &settings.display
            )
        )?;
    }
    writeln!(out, "{}", session_footer(&session))?;
    if !session.compare().is_empty() {
        writeln!(out, "{}", session.compare_link())?;
    }
    Ok(())
}

pub fn run_facets(args: &FacetsArgs, settings: &Settings) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let mut session = mount(&catalog, settings.browse);
    apply_filters(&mut session, &args.filters)?;
    if session.schema().facets.is_empty() && session.schema().ranges.is_empty() {
        println!("{} declares no facets", args.catalog.display());
        return Ok(());
    }
    println!("{}", facets_table(&session));
    println!("{}", session_footer(&session));
    Ok(())
}

pub fn run_show(args: &ShowArgs, settings: &Settings) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let mut session = mount(&catalog, settings.browse);
    let id = ItemId::new(args.id.as_str()).context("item id")?;
    if !session.inspect(&id) {
        bail!("no item {id} in {}", args.catalog.display());
    }
    if let Some(item) = session.quick_view() {
        println!("{}", item_detail(item, &settings.display));
    }
    Ok(())
}

pub fn run_compare(args: &CompareArgs, settings: &Settings) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let session = mount(&catalog, settings.browse);
    if session.apply_compare_link(&args.link) == 0 {
        println!("compare link holds no known items");
        return Ok(());
    }
    let items = session.compared_items();
    println!(
        "{}",
        compare_table(&items, session.schema(), &settings.display)
    );
    println!("{}", session.compare_link());
    Ok(())
}

pub fn run_browse(args: &BrowseArgs, settings: &Settings) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let mut session = mount(&catalog, browse_options(settings, args.page_size));
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    run_loop(&mut session, &settings.display, stdin.lock(), &mut out)
}

pub fn run_settings(
    args: &SettingsArgs,
    explicit: Option<&Path>,
    settings: &Settings,
) -> Result<()> {
    let path = explicit.map(Path::to_path_buf).or_else(settings_path);
    if args.write {
        let Some(path) = path else {
            bail!("no platform settings path; pass --settings <PATH>");
        };
        save_settings(settings, &path)?;
        println!("saved settings to {}", path.display());
        return Ok(());
    }
    match path {
        Some(path) => println!("# {}", path.display()),
        None => println!("# no platform settings path"),
    }
    print!("{}", render_settings(settings)?);
    Ok(())
}

fn mount(catalog: &Catalog, options: BrowseOptions) -> CatalogSession {
    CatalogSession::new(Arc::clone(&catalog.store), catalog.engine(), options)
}

fn browse_options(settings: &Settings, page_size: Option<NonZeroUsize>) -> BrowseOptions {
    match page_size {
        Some(page_size) => settings.browse.with_page_size(page_size),
        None => settings.browse,
    }
}

fn apply_filters(session: &mut CatalogSession, args: &FilterArgs) -> Result<()> {
    let facets = args
        .facets
        .iter()
        .map(|raw| parse_facet_assignment(raw).with_context(|| format!("--facet {raw}")))
        .collect::<Result<Vec<_>>>()?;
    let ranges = args
        .ranges
        .iter()
        .map(|raw| parse_range_assignment(raw).with_context(|| format!("--range {raw}")))
        .collect::<Result<Vec<_>>>()?;

    session.update_filters(|filters| {
        if let Some(query) = &args.query {
            filters.set_query(query.as_str());
        }
        if let Some(sort) = args.sort {
            filters.set_sort(sort);
        }
        for (name, range) in ranges {
            filters.set_range(name, range);
        }
    });
    for (name, value) in facets {
        session.require(&name, &value);
    }
    Ok(())
}
