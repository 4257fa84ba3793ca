use chain_hash::ChainHash;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'k', long = "keys", default_value_t = 1000)]
    keys: u64,

    #[arg(short = 'c', long = "capacity", default_value_t = 10)]
    capacity: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!(
        "Creating ChainHash with {} buckets, inserting {} keys",
        args.capacity, args.keys
    );

    let mut table: ChainHash<u64, u64> = ChainHash::with_capacity(args.capacity);
    let mut growths = 0;
    for key in 0..args.keys {
        let before = table.bucket_count();
        table.set(key, key * key);
        if table.bucket_count() != before {
            growths += 1;
            println!(
                "  after {:>6} keys: {:>6} -> {:>6} buckets",
                table.len(),
                before,
                table.bucket_count()
            );
        }
    }

    println!("Inserted {} keys, grew {} times", table.len(), growths);
    println!("Final fill factor: {:.2}%", table.fill_factor() * 100.0);

    table.stats().print();
}
