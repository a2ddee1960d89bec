use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Show everything known about a kanji, plus a fresh mnemonic
    Lookup {
        kanji: String,

        /// Skip mnemonic generation
        #[arg(long)]
        no_mnemonic: bool,

        /// Write the styled stroke-order diagram to this file
        #[arg(long)]
        svg: Option<String>,

        /// Black strokes and grey numbers instead of the high-contrast palette
        #[arg(long)]
        standard_colors: bool,

        /// Hide the stroke numbers
        #[arg(long)]
        no_numbers: bool,

        #[arg(long, default_value = "4", value_parser = clap::value_parser!(u32).range(2..=8))]
        stroke_width: u32,
    },

    /// Print only the mnemonic line
    Mnemonic { kanji: String },

    /// Print the radical documents retrieved for the given names
    Retrieve {
        #[arg(required = true)]
        radicals: Vec<String>,
    },

    /// Print the exact prompt that would be sent to the generator
    Prompt { kanji: String },

    Stats,
}
