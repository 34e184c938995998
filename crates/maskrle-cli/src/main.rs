use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use maskrle_rs::{area, decode, file, from_base64, rle, to_base64, to_bbox, Mask};

#[derive(Parser)]
#[command(name = "maskrle")]
#[command(about = "Encode, decode and inspect RLE segmentation masks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text masks (rows of 0/1 characters) into RLE containers
    Encode {
        /// Input mask files
        inputs: Vec<PathBuf>,

        /// Directory for the output containers (default: next to each input)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Decode an RLE container back to a text mask
    Decode {
        input: PathBuf,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the Base64 transport string for an RLE container
    Pack { input: PathBuf },
    /// Rebuild an RLE container from a Base64 transport string
    Unpack {
        b64: String,

        #[arg(long)]
        out: PathBuf,
    },
    /// Show shape, area, run count and bounding box of a container
    Info { input: PathBuf },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Encode { inputs, dir } => encode_cmd(&inputs, dir.as_deref()),
        Command::Decode { input, out } => decode_cmd(&input, out.as_deref()),
        Command::Pack { input } => pack_cmd(&input),
        Command::Unpack { b64, out } => unpack_cmd(&b64, &out),
        Command::Info { input } => info_cmd(&input),
    }
}

fn encode_cmd(inputs: &[PathBuf], dir: Option<&Path>) -> Result<()> {
    if inputs.is_empty() {
        bail!("no input mask files given");
    }

    let masks: Vec<Mask> = inputs
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading mask {}", path.display()))?;
            parse_text_mask(&text).with_context(|| format!("parsing mask {}", path.display()))
        })
        .collect::<Result<_>>()?;

    let rles = rle::encode_all(&masks);

    for (path, rle) in inputs.iter().zip(&rles) {
        let out = container_path(path, dir);
        file::save_rle(&out, rle)
            .with_context(|| format!("writing container {}", out.display()))?;
        info!(
            "{} -> {} ({}x{}, {} runs)",
            path.display(),
            out.display(),
            rle.h,
            rle.w,
            rle.counts.len()
        );
    }
    Ok(())
}

fn decode_cmd(input: &Path, out: Option<&Path>) -> Result<()> {
    let mask = file::load(input).with_context(|| format!("loading {}", input.display()))?;
    let text = render_text_mask(&mask);
    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            info!("{} -> {}", input.display(), path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn pack_cmd(input: &Path) -> Result<()> {
    let rle = file::load_rle(input).with_context(|| format!("loading {}", input.display()))?;
    let mask = decode(&rle)?;
    println!("{}", to_base64(&mask)?);
    Ok(())
}

fn unpack_cmd(b64: &str, out: &Path) -> Result<()> {
    let mask = from_base64(b64).context("decoding transport string")?;
    file::save(out, &mask).with_context(|| format!("writing container {}", out.display()))?;
    info!("unpacked {}x{} mask to {}", mask.h(), mask.w(), out.display());
    Ok(())
}

fn info_cmd(input: &Path) -> Result<()> {
    let rle = file::load_rle(input).with_context(|| format!("loading {}", input.display()))?;
    let mask = decode(&rle)?;

    println!("shape: {}x{}", rle.h, rle.w);
    println!("runs:  {}", rle.counts.len());
    println!("area:  {}", area(&rle));
    match to_bbox(&mask) {
        Some(bb) => println!(
            "bbox:  x={}..{} y={}..{}",
            bb.x0, bb.x1, bb.y0, bb.y1
        ),
        None => println!("bbox:  none (no foreground)"),
    }
    Ok(())
}

fn container_path(input: &Path, dir: Option<&Path>) -> PathBuf {
    let mut out = input.with_extension("rle.json");
    if let (Some(dir), Some(name)) = (dir, out.file_name().map(|n| n.to_owned())) {
        out = dir.join(name);
    }
    out
}

fn parse_text_mask(text: &str) -> Result<Mask> {
    let rows: Vec<Vec<bool>> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.chars()
                .map(|c| match c {
                    '0' => Ok(false),
                    '1' => Ok(true),
                    other => bail!("mask rows may only hold 0 or 1, found {other:?}"),
                })
                .collect()
        })
        .collect::<Result<_>>()?;

    if rows.is_empty() {
        bail!("mask file holds no rows");
    }
    let w = rows[0].len();
    if rows.iter().any(|r| r.len() != w) {
        bail!("mask rows have uneven widths");
    }
    Ok(Mask::from_rows(&rows))
}

fn render_text_mask(mask: &Mask) -> String {
    let mut out = String::with_capacity(mask.h() as usize * (mask.w() as usize + 1));
    for y in 0..mask.h() {
        for x in 0..mask.w() {
            out.push(if mask.get(y, x) { '1' } else { '0' });
        }
        out.push('\n');
    }
    out
}
