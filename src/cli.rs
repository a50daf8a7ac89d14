use clap::Parser;
use form_fill_common::DEFAULT_CONFIDENCE_THRESHOLD;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fill-form")]
#[command(about = "Fill a PDF or image form using the Datalab API", long_about = None)]
pub struct Cli {
    /// Path to form file or URL
    pub form: String,

    /// Path to JSON file with field data
    pub field_data: PathBuf,

    /// Output file path (default: filled_<input_name>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Context for field matching
    #[arg(short, long)]
    pub context: Option<String>,

    /// Confidence threshold (0.0-1.0)
    #[arg(short, long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    pub threshold: f64,

    /// Page range (e.g., '0-2')
    #[arg(short, long)]
    pub page_range: Option<String>,

    /// Use async client
    #[arg(long = "async")]
    pub use_async: bool,

    /// Print debug logs
    #[arg(short, long)]
    pub verbose: bool,
}
