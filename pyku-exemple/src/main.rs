use std::path::Path;

use pyku_core::Error;
use pyku_core::config::Settings;
use pyku_core::model::markov_chain::MarkovChain;
use pyku_core::model::picker::RandomPicker;
use pyku_core::model::writer::Writer;
use pyku_core::source::DirectorySource;
use pyku_core::syllable::counter::SyllableCounter;
use pyku_core::syllable::dictionary::Dictionary;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Settings are optional; every field has a default
    // (max order 4, corpus in "data/corpus", dictionary in "data/")
    let settings = if Path::new("pyku.toml").exists() {
        Settings::load("pyku.toml")?
    } else {
        Settings::default()
    };

    // Load the parsed dictionary, or parse the raw CMU file and cache it
    let dictionary = Dictionary::load_or_build(&settings.raw_dictionary, &settings.parsed_dictionary)?;
    let counter = SyllableCounter::with_dictionary(dictionary);

    // Every ".txt" file of the corpus directory is a source text
    // ('posts'), or each of its paragraphs is ('comments')
    let mut chain = MarkovChain::with_counter(settings.max_order, counter);
    let mut source = DirectorySource::new(&settings.corpus);
    chain.ingest_source(&mut source, settings.location)?;
    log::info!("{} words guessed outside the dictionary", chain.counter().guessed());

    // A fixed seed gives the same haiku for the same corpus
    let mut picker = match settings.seed {
        Some(seed) => RandomPicker::seeded(seed),
        None => RandomPicker::from_os_rng(),
    };

    // Small corpora often paint themselves into a corner: retry a few times
    let writer = Writer::new(&chain);
    for attempt in 1..=settings.attempts {
        match writer.haiku(&mut picker) {
            Ok(haiku) => {
                println!("{haiku}");
                return Ok(());
            }
            Err(err @ Error::Unsatisfiable { .. }) => log::debug!("attempt {attempt} failed: {err}"),
            Err(err) => return Err(err.into()),
        }
    }

    Err(format!("no haiku after {} attempts", settings.attempts).into())
}
