use std::path::PathBuf;

use clap::Parser;

use crate::error::Result;
use crate::query::{Field, QuerySpec, SortDirection};
use crate::timestamp;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct CliOptions {
    /// Comma-delimited field names (index,visit_time,title,url)
    #[arg(short, long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Find urls and titles containing this
    #[arg(short, long)]
    pub query: Option<String>,

    /// Find urls containing this
    #[arg(short, long)]
    pub url: Option<String>,

    /// Find titles containing this
    #[arg(short, long)]
    pub title: Option<String>,

    /// Launch the Nth result (first, if no N given) in the default browser
    #[arg(short, long, value_name = "N", num_args = 0..=1, default_missing_value = "1")]
    pub launch: Option<usize>,

    /// Minimum visit date, local time (e.g. 2024-01-31 or "2024-01-31 09:00:00")
    #[arg(short = 'd', long)]
    pub min_date: Option<String>,

    /// Maximum visit date, local time
    #[arg(short = 'D', long)]
    pub max_date: Option<String>,

    /// Sort by visit time, ascending
    #[arg(short, long)]
    pub sort: bool,

    /// Sort by visit time, descending
    #[arg(short = 'S', long)]
    pub sort_descending: bool,

    /// Path to the live browser history store
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Path to the merged history store
    #[arg(long)]
    pub merged: Option<PathBuf>,

    /// Optional path to config file (YAML)
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Write the zsh completion file and exit
    #[arg(long)]
    pub write_completions: bool,
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}

/// Convert parsed flags into the query spec, once, at the boundary.
/// Returns the unrecognized field names alongside so the caller can
/// report them; date bounds are encoded here so a bad date aborts
/// before any store work.
pub fn build_spec(opts: &CliOptions) -> Result<(QuerySpec, Vec<String>)> {
    let mut unknown = Vec::new();
    let fields = match &opts.fields {
        Some(names) => {
            let mut fields = Vec::new();
            for name in names {
                match Field::parse(name) {
                    Some(field) => fields.push(field),
                    None => unknown.push(name.clone()),
                }
            }
            fields
        }
        None => Field::ALL.to_vec(),
    };

    let sort = if opts.sort_descending {
        SortDirection::Descending
    } else if opts.sort {
        SortDirection::Ascending
    } else {
        SortDirection::None
    };

    let spec = QuerySpec {
        url_substring: opts.url.clone(),
        title_substring: opts.title.clone(),
        free_text: opts.query.clone(),
        min_time: opts.min_date.as_deref().map(timestamp::encode).transpose()?,
        max_time: opts.max_date.as_deref().map(timestamp::encode).transpose()?,
        sort,
        fields,
    };
    Ok((spec, unknown))
}
