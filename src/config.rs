//! Host configuration parsed from flags and environment variables.

use std::path::PathBuf;

use canvas::consts::DEFAULT_TRASH;
use canvas::geom::Rect;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "stickyboard", about = "Sticky-notes board driven by board-local pointer events")]
pub struct Config {
    /// Directory holding the persisted note blob.
    #[arg(long, env = "STICKYBOARD_DATA_DIR", default_value = ".stickyboard")]
    pub data_dir: PathBuf,

    /// Trash target bounds as `x,y,width,height`.
    #[arg(long, env = "STICKYBOARD_TRASH", value_parser = parse_rect)]
    pub trash: Option<Rect>,

    /// Seed for color picks; OS entropy when absent.
    #[arg(long, env = "STICKYBOARD_SEED")]
    pub seed: Option<u64>,

    /// Read events from this file instead of stdin.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl Config {
    #[must_use]
    pub fn trash_rect(&self) -> Rect {
        self.trash.unwrap_or(DEFAULT_TRASH)
    }
}

pub fn parse_rect(raw: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let &[x, y, w, h] = parts.as_slice() else {
        return Err(format!("expected x,y,width,height but got '{raw}'"));
    };
    let num = |s: &str| match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("number must be finite: '{s}'")),
        Err(e) => Err(format!("invalid number '{s}': {e}")),
    };
    let (x, y, w, h) = (num(x)?, num(y)?, num(w)?, num(h)?);
    if w < 0.0 || h < 0.0 {
        return Err(format!("trash size must not be negative: '{raw}'"));
    }
    Ok(Rect::new(x, y, w, h))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
