use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use gotoh_align::io::fasta_reader::FastaReader;
use gotoh_align::utils::entropy;
use gotoh_align::{glb_align, lcl_align, sg_align, Cigar, ScoreMatrix};

#[derive(Parser)]
#[command(name = "gotoh-align")]
#[command(about = "Affine-gap pairwise alignment with CIGAR output", long_about = None)]
#[command(version)]
struct Cli {
    /// First sequence (query): literal bases, or @FILE.fa[.gz] for the first
    /// FASTA record
    #[arg(value_name = "SEQ_A")]
    seq_a: String,

    /// Second sequence (subject): literal bases or @FILE.fa[.gz]
    #[arg(value_name = "SEQ_B")]
    seq_b: String,

    /// Alignment mode
    #[arg(short = 'm', long, value_enum, default_value = "global")]
    mode: Mode,

    /// Pin the alignment start to the beginning of both sequences
    /// (semiglobal mode)
    #[arg(long)]
    pin_left: bool,

    /// Pin the alignment end to the end of both sequences (semiglobal mode)
    #[arg(long)]
    pin_right: bool,

    /// Match score (DNA matrix)
    #[arg(short = 'A', long, value_name = "INT", default_value = "1")]
    match_score: i8,

    /// Mismatch penalty (DNA matrix)
    #[arg(short = 'B', long, value_name = "INT", default_value = "2")]
    mismatch_penalty: i8,

    /// Gap open penalty (a one-base gap costs open + extend)
    #[arg(short = 'O', long, value_name = "INT", default_value = "3")]
    gap_open: i32,

    /// Gap extension penalty
    #[arg(short = 'E', long, value_name = "INT", default_value = "1")]
    gap_extend: i32,

    /// Score with BLOSUM62 instead of the DNA match/mismatch matrix
    #[arg(long)]
    protein: bool,

    /// Emit a detailed CIGAR (= and X instead of M)
    #[arg(long)]
    detailed: bool,

    /// Print the aligned sequences
    #[arg(long)]
    show_alignment: bool,

    /// Verbosity (1=error, 2=warning, 3=info, 4+=debug)
    #[arg(short = 'v', long, value_name = "INT", default_value = "3")]
    verbosity: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Global,
    Local,
    Semiglobal,
}

fn load_sequence(arg: &str) -> std::io::Result<Vec<u8>> {
    if let Some(path) = arg.strip_prefix('@') {
        let mut reader = FastaReader::new(&PathBuf::from(path))?;
        match reader.read_record()? {
            Some(record) => {
                log::info!("read {} ({} bp) from {path}", record.id(), record.seq().len());
                Ok(record.seq().to_vec())
            }
            None => Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("no FASTA records in {path}"),
            )),
        }
    } else {
        Ok(arg.as_bytes().to_vec())
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    if cli.mode != Mode::Semiglobal && (cli.pin_left || cli.pin_right) {
        log::warn!("--pin-left/--pin-right only apply to --mode semiglobal");
    }

    let a = match load_sequence(&cli.seq_a) {
        Ok(seq) => seq,
        Err(e) => {
            log::error!("failed to read first sequence: {e}");
            std::process::exit(1);
        }
    };
    let b = match load_sequence(&cli.seq_b) {
        Ok(seq) => seq,
        Err(e) => {
            log::error!("failed to read second sequence: {e}");
            std::process::exit(1);
        }
    };

    let matrix = if cli.protein {
        ScoreMatrix::blosum62()
    } else {
        ScoreMatrix::dna(cli.match_score, cli.mismatch_penalty)
    };

    let (rho, sigma) = (cli.gap_open, cli.gap_extend);
    let cigar = match cli.mode {
        Mode::Global => glb_align(&a, &b, rho, sigma, &matrix),
        Mode::Local => lcl_align(&a, &b, rho, sigma, &matrix),
        Mode::Semiglobal => sg_align(&a, &b, rho, sigma, cli.pin_left, cli.pin_right, &matrix),
    };

    report(&cli, &cigar, &a, &b, rho, sigma, &matrix);
}

fn report(cli: &Cli, cigar: &Cigar, a: &[u8], b: &[u8], rho: i32, sigma: i32, matrix: &ScoreMatrix) {
    let qlen = a.len() as i32;
    let rendered = if cli.detailed {
        cigar.detailed_cigar_string(0, qlen, a, b)
    } else {
        cigar.cigar_string(0, qlen)
    };

    let (qfrom, qto) = cigar.query_range();
    let (sfrom, sto) = cigar.subject_range();
    println!("CIGAR: {rendered}");
    println!("query span: {qfrom}..{qto}  subject span: {sfrom}..{sto}");
    println!("score: {}", cigar.score(a, b, rho, sigma, matrix));
    println!(
        "matches: {}  edit distance: {}",
        cigar.matches(a, b),
        cigar.distance(a, b)
    );
    println!("query entropy: {:.4}", entropy(a));

    if cli.show_alignment {
        let (top, bottom) = cigar.to_align(a, b);
        println!("{}", String::from_utf8_lossy(&top));
        println!("{}", String::from_utf8_lossy(&bottom));
    }
}
