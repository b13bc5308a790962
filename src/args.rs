use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use kleinanzeigen_autos::ScraperConfig;

#[derive(Parser, Debug)]
#[command(name = "kleinanzeigen-autos")]
#[command(about = "Harvests used-car listings from ebay-kleinanzeigen.de into a CSV file")]
#[command(version)]
pub struct Args {
    /// Make of the car, e.g. "bmw"
    #[arg(short, long)]
    pub make: String,

    /// Model or year to narrow the search, e.g. "golf" or "2015"
    #[arg(short = 'y', long, default_value = "")]
    pub model_or_year: String,

    /// Run the browser headless (true) or with a visible window (false)
    #[arg(short = 'b', long, action = ArgAction::Set, default_value_t = true,
          value_parser = BoolishValueParser::new())]
    pub headless: bool,

    /// CSV file to write the listings to
    #[arg(short, long)]
    pub output: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// URL of the WebDriver server
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Pause between result pages, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

impl Args {
    /// Lay command-line overrides on top of a loaded configuration
    pub fn apply(&self, mut config: ScraperConfig) -> ScraperConfig {
        config.headless = self.headless;
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(webdriver_url) = &self.webdriver_url {
            config.webdriver_url = webdriver_url.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = delay_ms;
        }
        config
    }
}
