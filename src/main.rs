use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::{Color as TermColor, Stylize};
use log::info;

use swatchbook::cli::{Args, Commands};
use swatchbook::color::Hex;
use swatchbook::error::Error;
use swatchbook::icon::png_data_uri;
use swatchbook::panel::{Section, Workspace, NO_COLORS_MESSAGE};
use swatchbook::pipeline::generate_ramp;
use swatchbook::store::PRIMARY;
use swatchbook::tui::{self, TuiApp};

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level.as_filter()),
    )
    .init();

    let variations = usize::from(args.variations);
    match args.command {
        Commands::Ramp { color, json } => ramp(&color, variations, json),
        Commands::Scan {
            files,
            primary,
            json,
        } => scan(&files, primary, variations, json),
        Commands::Icon { color } => {
            let uri = png_data_uri(&color).context("failed to encode icon")?;
            println!("{uri}");
            Ok(())
        }
        Commands::Panel { files, primary } => {
            let mut workspace = Workspace::new(variations);
            if let Some(primary) = primary {
                workspace
                    .store_mut(Section::Palette)
                    .add_color(&primary, PRIMARY);
                workspace.regenerate();
            }
            tui::run(TuiApp::new(workspace, files))
        }
    }
}

fn ramp(color: &Hex, variations: usize, json: bool) -> Result<()> {
    let ramp = generate_ramp(color, variations);
    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &ramp)?;
        writeln!(out)?;
        return Ok(());
    }
    let swatches = io::stdout().is_terminal();
    writeln!(out, "Tints")?;
    for tint in &ramp.tints {
        write_color_line(&mut out, tint, swatches)?;
    }
    writeln!(out, "Shades")?;
    for shade in &ramp.shades {
        write_color_line(&mut out, shade, swatches)?;
    }
    Ok(())
}

fn scan(files: &[PathBuf], primary: Option<Hex>, variations: usize, json: bool) -> Result<()> {
    let mut workspace = Workspace::new(variations);
    if let Some(primary) = &primary {
        workspace
            .store_mut(Section::Palette)
            .add_color(primary, PRIMARY);
    }

    let mut any = false;
    for path in files {
        let text = read_input(path)?;
        match workspace.scan(&text) {
            Ok(report) => {
                info!("{}: {} colors", path.display(), report.found.len());
                any = true;
            }
            Err(Error::EmptyScanResult) => info!("{}: no colors", path.display()),
            Err(e) => return Err(e.into()),
        }
    }

    let mut out = io::stdout().lock();
    if !any {
        writeln!(out, "{NO_COLORS_MESSAGE}")?;
        return Ok(());
    }

    let document = workspace.store(Section::Document);
    if json {
        serde_json::to_writer_pretty(&mut out, &document.snapshot())?;
        writeln!(out)?;
        return Ok(());
    }
    let swatches = io::stdout().is_terminal();
    for category in document.categories() {
        let colors = document.colors(category).unwrap_or_default();
        writeln!(out, "{category} ({})", colors.len())?;
        for color in colors {
            write_color_line(&mut out, color, swatches)?;
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_color_line(out: &mut impl Write, color: &Hex, swatch: bool) -> io::Result<()> {
    if swatch {
        let [r, g, b] = color.rgb().channels();
        writeln!(out, "  {} {color}", "    ".on(TermColor::Rgb { r, g, b }))
    } else {
        writeln!(out, "  {color}")
    }
}
