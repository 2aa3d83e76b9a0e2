use anyhow::Result;
use tracing::{info, warn};

use bhq::{
    cli,
    completion,
    config,
    launch::SystemOpener,
    logging,
    project::{self, LaunchOutcome},
    query,
    render,
    snapshot::Snapshot,
    store::MergedStore,
};

fn main() -> Result<()> {
    logging::init_logging();

    let opts = cli::parse();
    if opts.write_completions {
        let path = completion::write_zsh_completion()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let config = config::load_config(opts.config_path.as_deref())?;
    let paths = config::resolve(&config, opts.source.clone(), opts.merged.clone())?;
    let (spec, unknown_fields) = cli::build_spec(&opts)?;
    for name in unknown_fields {
        warn!("unknown field in --fields: {name}");
    }

    info!(
        "source={} merged={}",
        paths.source.display(),
        paths.merged.display()
    );

    let snapshot = Snapshot::acquire(&paths.source, &paths.snapshot_dir)?;
    let mut store = MergedStore::open(&paths.merged)?;
    let stats = store.merge_snapshot(snapshot.path())?;
    info!(
        "merge added {} urls, {} visits",
        stats.urls_added, stats.visits_added
    );

    let rows = query::run(store.connection(), &spec)?;

    if let Some(ordinal) = opts.launch {
        match project::launch(&rows, ordinal, &SystemOpener)? {
            LaunchOutcome::Opened { ordinal, url } => {
                println!("opening result #{ordinal}: {url}");
            }
            LaunchOutcome::NotFound { requested, matched } => {
                println!("no result #{requested} to launch ({matched} matches)");
            }
        }
    } else if rows.is_empty() {
        println!("no matches");
    } else {
        let use_color = !opts.no_color && std::env::var_os("NO_COLOR").is_none();
        for row in project::project(&rows, &spec) {
            println!("{}", render::render_line(&row, use_color));
        }
    }

    Ok(())
}
