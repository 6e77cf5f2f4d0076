use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use svgsmith::{CompileOptions, compile_with_options};

#[derive(Parser, Debug)]
#[command(name = "svgsmith", about = "Compile an HTML/CSS fragment into a self-contained SVG")]
struct Args {
    /// HTML file, or `-` for stdin
    #[arg(long, default_value = "-")]
    html: String,

    /// CSS file applied before any <style> blocks in the markup
    #[arg(long)]
    css: Option<PathBuf>,

    #[arg(long, default_value_t = 800.0)]
    width: f32,

    #[arg(long, default_value_t = 400.0)]
    height: f32,

    /// Output file (stdout when omitted)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Fixed prefix for gradient/filter ids
    #[arg(long)]
    id_prefix: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let html = if args.html == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read HTML from stdin")?;
        buf
    } else {
        fs::read_to_string(&args.html).with_context(|| format!("failed to read {}", args.html))?
    };
    let css = match &args.css {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?,
        None => String::new(),
    };

    let mut options = CompileOptions::new(args.width, args.height);
    if let Some(prefix) = args.id_prefix {
        options = options.with_id_prefix(prefix);
    }

    let svg = compile_with_options(&html, &css, &options)?;
    log::info!("Compiled {} bytes of SVG", svg.len());

    match &args.out {
        Some(path) => fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", svg),
    }

    Ok(())
}
