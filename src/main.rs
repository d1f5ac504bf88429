//! # Doclin Paper CLI
//!
//! Usage:
//!   doclin-paper paper.json -o paper.pdf
//!   echo '{ ... }' | doclin-paper
//!   doclin-paper --example > paper.json
//!   RUST_LOG=debug doclin-paper paper.json --summary

use clap::Parser;
use doclin_paper::{ExamPaper, LayoutEngine, PaperArtifact, PaperConfig, PaperError};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Lay out an exam question paper into A4 pages and write PDF")]
struct Args {
    /// Exam paper JSON. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Output PDF path. Defaults to <subject>_<year>_Paper.pdf
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page geometry and first-page text as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a sample exam paper and exit
    #[arg(long)]
    example: bool,

    /// Print the laid-out pages as JSON instead of writing a PDF
    #[arg(long)]
    layout_json: bool,

    /// Print page count and every page break to stderr
    #[arg(long)]
    summary: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.example {
        print!("{}", example_paper_json());
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), PaperError> {
    let input = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let config = match &args.config {
        Some(path) => PaperConfig::load(path)?,
        None => PaperConfig::default(),
    };
    let paper = ExamPaper::from_json(&input)?;
    let engine = LayoutEngine::new(config)?;

    if args.layout_json {
        println!("{}", engine.layout(&paper).to_json()?);
        return Ok(());
    }

    let artifact = PaperArtifact::render(&engine, &paper);
    if args.summary {
        eprintln!("{} pages, {} page breaks", artifact.page_count, artifact.breaks.len());
        for event in &artifact.breaks {
            eprintln!(
                "  page {}: {:?} needed {:.1}mm at y={:.1}",
                event.page, event.cause, event.needed, event.cursor_y
            );
        }
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&artifact.file_name));
    fs::write(&output, &artifact.bytes)?;
    eprintln!(
        "✓ Written {} pages ({} bytes) to {}",
        artifact.page_count,
        artifact.bytes.len(),
        output.display()
    );
    Ok(())
}

fn example_paper_json() -> &'static str {
    r##"{
  "exam": {
    "subject": "Physics",
    "paper_name": "Paper 1 (Theory)",
    "paper_code": "PHY",
    "year": 2023,
    "board": "ICSE",
    "maximum_marks": 80,
    "time_allowed": "Two hours",
    "reading_time": "Fifteen minutes"
  },
  "sections": [
    {
      "name": "Section A",
      "marks": 40,
      "instruction": "Attempt all questions from this section.",
      "questions": [
        {
          "number": 1,
          "total_marks": 15,
          "instruction": "Choose the correct answers to the questions from the given options.",
          "parts": [
            {
              "number": "i",
              "marks": 1,
              "question": "The SI unit of electric potential difference is:",
              "options": [
                { "option_letter": "(a)", "text": "Ampere" },
                { "option_letter": "(b)", "text": "Ohm" },
                { "option_letter": "(c)", "text": "Volt" },
                { "option_letter": "(d)", "text": "Coulomb" }
              ]
            },
            {
              "number": "ii",
              "marks": 2,
              "description": "Explain why a convex lens is called a converging lens.",
              "diagram": true
            }
          ]
        },
        {
          "number": 2,
          "total_marks": 10,
          "parts": [
            {
              "number": "i",
              "marks": 6,
              "question": "Answer the following:",
              "sub_parts": [
                { "letter": "(a)", "question": "State the principle of moments.", "marks": 2 },
                { "letter": "(b)", "question": "Define the moment of a force.", "marks": 2 },
                { "letter": "(c)", "question": "Give one example of a class II lever.", "marks": 2 }
              ]
            },
            {
              "number": "ii",
              "marks": 4,
              "description": "A body of mass 2 kg falls freely from a height of 20 m. Calculate its kinetic energy just before it reaches the ground."
            }
          ]
        }
      ]
    },
    {
      "name": "Section B",
      "marks": 40,
      "instruction": "Attempt any four questions from this section.",
      "questions": [
        {
          "number": 3,
          "total_marks": 10,
          "parts": [
            { "number": "i", "marks": 3, "description": "Draw a labelled ray diagram of a simple microscope.", "diagram": true },
            { "number": "ii", "marks": 3, "description": "State two factors affecting the resistance of a wire." },
            { "number": "iii", "marks": 4, "description": "Calculate the equivalent resistance of three 6 ohm resistors connected in parallel." }
          ]
        }
      ]
    }
  ]
}
"##
}
