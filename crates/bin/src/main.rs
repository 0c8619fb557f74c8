use clap::Parser;
use conftree::{Node, Store, codec};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands, DumpArgs, GetArgs, SetArgs};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("conftree=warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Get(args) => get(args),
        Commands::Set(args) => set(args),
        Commands::Dump(args) => dump(args),
    }
}

fn get(args: GetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = Store::new();
    store.load_from_file(&args.file)?;
    match store.traverse(&args.path) {
        Some(node) => match node.as_str() {
            Some(text) => println!("{text}"),
            // containers and null print as a YAML fragment
            None => print!("{}", codec::encode(node)),
        },
        None => {
            eprintln!("no value at '{}'", args.path);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn set(args: SetArgs) -> Result<(), Box<dyn std::error::Error>> {
    // a missing file starts empty; the source stays bound for the save
    let mut store = Store::open(&args.file);
    let item = match args.value {
        Some(value) => Node::Scalar(value),
        None => Node::Null,
    };
    store.set_item(&args.path, item)?;
    store.save()?;
    Ok(())
}

fn dump(args: DumpArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = Store::new();
    store.load_from_file(&args.file)?;
    print!("{}", codec::encode(store.root()));
    Ok(())
}
