use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use lm_gen_core::config::DEFAULT_MAX_ORDER;
use lm_gen_core::{Generator, LanguageModel, ModelConfig, START_TOKEN, TrailingSentence, split_tokens};

/// Train an n-gram language model on a tokenized corpus and print random completions.
#[derive(Parser, Debug)]
#[command(name = "lm-gen", version)]
struct Args {
	/// Corpus of whitespace-separated tokens, sentences ending with </s>
	corpus: PathBuf,

	/// Maximum n-gram order to estimate (>= 2)
	#[arg(short, long, default_value_t = DEFAULT_MAX_ORDER)]
	order: usize,

	/// Seed of the random source
	#[arg(short, long, default_value_t = 0)]
	seed: u64,

	/// Write the vocabulary, one word per line
	#[arg(long)]
	vocab: Option<PathBuf>,

	/// Write the n-gram counts, one `<ngram>\t<count>` per line
	#[arg(long)]
	counts: Option<PathBuf>,

	/// Space-separated history to complete
	#[arg(long, default_value = START_TOKEN)]
	history: String,

	/// Number of completions to print
	#[arg(short = 'n', long, default_value_t = 1)]
	samples: usize,

	/// Drop tokens after the last </s> instead of counting them
	#[arg(long)]
	discard_trailing: bool,

	/// Load/store a binary model next to the corpus
	#[arg(long)]
	cache: bool,
}

impl Args {
	fn config(&self) -> lm_gen_core::Result<ModelConfig> {
		let trailing = if self.discard_trailing { TrailingSentence::Discard } else { TrailingSentence::Flush };
		let mut config = ModelConfig::new(self.order)?
			.with_trailing_sentence(trailing)
			.with_cache(self.cache);
		if let Some(path) = &self.vocab {
			config = config.with_vocab_report(path);
		}
		if let Some(path) = &self.counts {
			config = config.with_counts_report(path);
		}
		Ok(config)
	}
}

fn run(args: &Args) -> lm_gen_core::Result<()> {
	let config = args.config()?;
	let model = LanguageModel::train(&args.corpus, &config)?;

	// Generation is conditioned on the same order the model was trained with
	let history = split_tokens(&args.history);
	let mut generator = Generator::seeded(&model, args.seed);
	for _ in 0..args.samples {
		println!("{}", generator.complete(&history, model.max_order()));
	}

	Ok(())
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();
	match run(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("Error: {e}");
			ExitCode::from(1)
		}
	}
}
