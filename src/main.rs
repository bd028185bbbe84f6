//! `mutaview` command-line front end.
//!
//! Uploads a VCF to the scan service, lists the candidate mutations, and
//! optionally loads the structure for one of them into a headless session,
//! printing the resulting scene.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mutaview::engine::headless::HeadlessSession;
use mutaview::engine::{RenderSession, StructureSequencer, ViewerStatus};
use mutaview::scan::HttpScanService;
use mutaview::{Dashboard, MutaviewError, Notice, Options};
use web_time::Instant;

/// Interval between session ticks.
const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(
    name = "mutaview",
    version,
    about = "Scan a VCF and view a mutated residue on its protein structure"
)]
struct Args {
    /// Variant file to upload (must end in .vcf)
    #[arg(required_unless_present = "print_schema")]
    vcf: Option<PathBuf>,

    /// Index of the result to view (0-based)
    #[arg(short, long)]
    select: Option<usize>,

    /// TOML options file
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Give up on the scan or structure load after this many seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Print the options JSON schema and exit
    #[arg(long)]
    print_schema: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), MutaviewError> {
    let mut out = std::io::stdout().lock();

    if args.print_schema {
        let schema = serde_json::to_string_pretty(&Options::json_schema())
            .map_err(|e| MutaviewError::OptionsParse(e.to_string()))?;
        writeln!(out, "{schema}")?;
        return Ok(());
    }

    let options = match &args.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let Some(vcf) = args.vcf else {
        return Err(MutaviewError::InvalidUpload("no file given".into()));
    };

    let viewer = StructureSequencer::mount(options.viewer.clone(), |config| {
        HeadlessSession::create(config, &options.viewer)
    })?;
    let scanner = Arc::new(HttpScanService::new(&options.scan));
    let mut dash = Dashboard::new(&options, scanner, viewer);
    let deadline = deadline_after(args.timeout_secs);

    if !dash.choose_file(&vcf) {
        report(&mut out, dash.take_notices())?;
        return Err(MutaviewError::InvalidUpload(vcf.display().to_string()));
    }
    let _ = dash.start_upload(Instant::now())?;
    run_until(&mut dash, deadline, |d| !d.is_scanning())?;

    let notices = dash.take_notices();
    if notices.contains(&Notice::ScanFailed) {
        report(&mut out, notices)?;
        return Err(MutaviewError::Scan("no results".into()));
    }

    let results = dash.selection().results();
    if results.is_empty() {
        writeln!(out, "No pathogenic variants found.")?;
    }
    for (i, m) in results.iter().enumerate() {
        match m.probability() {
            Some(p) => writeln!(out, "{i:>3}  {}  (p={p:.2})", m.label())?,
            None => writeln!(out, "{i:>3}  {}", m.label())?,
        }
    }

    if let Some(index) = args.select {
        if !dash.select(index) {
            return Err(MutaviewError::Viewer(format!(
                "no result #{index} (have {})",
                dash.selection().results().len()
            )));
        }
        run_until(&mut dash, deadline, |d| {
            !matches!(d.viewer().status(), ViewerStatus::Loading { .. })
        })?;
        report(&mut out, dash.take_notices())?;
        if let Some(session) = dash.viewer().session() {
            write!(out, "{}", session.describe())?;
        }
    }

    writeln!(out, "status: {}", dash.indicator().status_label())?;
    dash.teardown();
    Ok(())
}

/// `timeout_secs` from now, or `None` when that is past what `Instant`
/// can represent.
fn deadline_after(timeout_secs: u64) -> Option<Instant> {
    Instant::now().checked_add(Duration::from_secs(timeout_secs))
}

/// Tick the session until `done` holds or `deadline` passes. A `None`
/// deadline never passes.
fn run_until<S: RenderSession>(
    dash: &mut Dashboard<S>,
    deadline: Option<Instant>,
    done: impl Fn(&Dashboard<S>) -> bool,
) -> Result<(), MutaviewError> {
    loop {
        let now = Instant::now();
        dash.tick(now);
        if done(dash) {
            return Ok(());
        }
        if deadline.is_some_and(|d| now >= d) {
            return Err(MutaviewError::Viewer("timed out".into()));
        }
        std::thread::sleep(FRAME);
    }
}

fn report(out: &mut impl Write, notices: Vec<Notice>) -> std::io::Result<()> {
    for notice in notices {
        writeln!(out, "! {notice}")?;
    }
    Ok(())
}
