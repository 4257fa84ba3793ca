use chain_hash::word_index::bag_of_words;
use chain_hash::word_index::render;
use clap::Parser;

const SAMPLE: [&str; 4] = [
    "La casa es grande",
    "El gato está en la casa",
    "La casa es bonita y grande",
    "El sol brilla sobre la casa",
];

/// Index documents by the words they contain.
#[derive(Parser, Debug)]
struct Args {
    /// Documents to index. Defaults to a small sample corpus.
    documents: Vec<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let documents: Vec<String> = if args.documents.is_empty() {
        SAMPLE.iter().map(|doc| doc.to_string()).collect()
    } else {
        args.documents
    };

    println!("Input documents:");
    for (i, doc) in documents.iter().enumerate() {
        println!("[{i}] \"{doc}\"");
    }
    println!();

    let index = bag_of_words(&documents);
    println!("Bag of words (word -> [documents]):");
    print!("{}", render(&index));
}
