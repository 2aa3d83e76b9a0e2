use std::path::PathBuf;

use anyhow::{Result, anyhow};

const ZSH_COMPLETION: &str = r#"#compdef bhq

_arguments \
  '-f[comma-delimited field names (index,visit_time,title,url)]' \
  '--fields[comma-delimited field names (index,visit_time,title,url)]' \
  '-q[find urls and titles containing this]' \
  '--query[find urls and titles containing this]' \
  '-u[find urls containing this]' \
  '--url[find urls containing this]' \
  '-t[find titles containing this]' \
  '--title[find titles containing this]' \
  '-l[launch the Nth result in the default browser]' \
  '--launch[launch the Nth result in the default browser]' \
  '-d[minimum visit date, local time]' \
  '--min-date[minimum visit date, local time]' \
  '-D[maximum visit date, local time]' \
  '--max-date[maximum visit date, local time]' \
  '-s[sort by visit time, ascending]' \
  '--sort[sort by visit time, ascending]' \
  '-S[sort by visit time, descending]' \
  '--sort-descending[sort by visit time, descending]' \
  '--source[path to the live browser history store]' \
  '--merged[path to the merged history store]' \
  '--config-path[optional path to config file]' \
  '--no-color[disable colored output]'
"#;

/// Write the zsh completion file for `bhq` and return its path.
pub fn write_zsh_completion() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
    let path = home.join(".config/zsh/completions/_bhq");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, ZSH_COMPLETION)?;
    Ok(path)
}
