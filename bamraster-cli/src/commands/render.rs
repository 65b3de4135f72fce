//! Render command: open the alignments, resolve the region, draw and write the image

use anyhow::{Context, Result};
use std::io::{BufWriter, Write};

use bamraster_core::io::{AlignmentReader, FastaReference};
use bamraster_core::{ReferenceSequence, Region};
use bamraster_render::export::{self, OutputFormat};
use bamraster_render::palette::colorizer_for;
use bamraster_render::{ImageComposer, RenderContext};

use crate::config::Config;
use crate::error::CliError;
use crate::Cli;

/// Fold command-line overrides into the loaded configuration
pub fn apply_overrides(config: &mut Config, cli: &Cli) {
    let render = &mut config.render;
    if let Some(width) = cli.width {
        render.width = width;
    }
    if cli.hide_bases {
        render.hide_bases = true;
    }
    if cli.print_name {
        render.print_name = true;
    }
    if let Some(gap) = cli.min_distance {
        render.min_horizontal_gap = gap;
    }
    if cli.clip {
        render.show_clipping = true;
    }
    if let Some(limit) = cli.limit {
        render.max_rows = limit;
    }
    if let Some(depth) = cli.depth {
        render.depth_height = depth;
    }
    if cli.no_read_gradient {
        render.read_gradient = false;
    }
    if !cli.highlight.is_empty() {
        render.highlights = cli.highlight.clone();
    }
    if let Some(gap) = cli.spaceyfeature {
        render.track_gap = gap;
    }
    if let Some(stroke) = cli.stroke {
        render.stroke = stroke.into();
    }
    if let Some(mapq) = cli.min_mapq {
        config.filter.min_mapping_quality = mapq;
    }
}

fn open_alignments(cli: &Cli) -> Result<AlignmentReader> {
    match &cli.input {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::file_not_found(path.clone()).into());
            }
            log::info!("Opening {}", path.display());
            AlignmentReader::open(path).with_context(|| format!("Failed to open alignments: {}", path.display()))
        }
        None => AlignmentReader::from_stdin().context("Failed to read alignment header from stdin"),
    }
}

fn load_reference(cli: &Cli, region: &Region) -> Result<ReferenceSequence> {
    match &cli.reference {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::file_not_found(path.clone()).into());
            }
            log::info!("Loading reference {} from {}", region.contig, path.display());
            FastaReference::new(path)
                .load_contig(&region.contig)
                .with_context(|| format!("Failed to load reference: {}", path.display()))
        }
        None => Ok(ReferenceSequence::Synthetic),
    }
}

pub fn execute(mut config: Config, cli: &Cli) -> Result<()> {
    apply_overrides(&mut config, cli);

    let region_text = cli
        .region
        .as_deref()
        .ok_or_else(|| CliError::config("Region was not defined"))?;

    let mut reader = open_alignments(cli)?;
    let region = Region::parse(region_text, Some(reader.dictionary()))
        .map_err(|e| CliError::region(region_text.to_string(), e.to_string()))?;
    log::info!("Interval is {}", region);
    if !reader.is_indexed() {
        log::debug!("No index available, streaming records up to {}", region);
    }

    let reference = load_reference(cli, &region)?;
    let ctx = RenderContext::new(region, reference, config.render).map_err(CliError::from)?;
    let colorizer = colorizer_for(ctx.config.stroke);

    let rendering = {
        let records = reader
            .fetch(&ctx.region)
            .with_context(|| format!("Failed to query {}", ctx.region))?;
        ImageComposer::new(&ctx, colorizer.as_ref()).render_records(records, &config.filter)?
    };
    drop(reader);

    match &cli.output {
        Some(path) => {
            export::save(&rendering.image, path)
                .with_context(|| format!("Failed to write image: {}", path.display()))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            export::write(&rendering.image, &mut out, OutputFormat::Png).context("Failed to write PNG to stdout")?;
            out.flush().context("Failed to write PNG to stdout")?;
        }
    }

    Ok(())
}
