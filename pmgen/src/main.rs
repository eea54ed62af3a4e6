mod display;
mod emitter;
mod error;
mod loader;
mod msg;

use error::Error;
use msg::Msg;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// JSON or YAML partition configurations
    #[clap(short, long, required = true, num_args = 1..)]
    input: Vec<String>,

    /// Header file name, stored in the same directory as each input
    #[clap(short, long)]
    output: String,

    /// Also write the resolved map as YAML
    #[clap(short, long)]
    map: Option<String>,

    /// Dump the resolved partitions
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("Partition Manager");

    if let Err(err) = run(&args) {
        err.print_diag();
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    println!("1. Load Partition Configurations");
    for path in &args.input {
        println!("  < {}", path);
    }
    let loader::Loaded { mut map, documents } = loader::load(&args.input)?;
    for doc in documents.iter().filter(|doc| doc.names.is_empty()) {
        Msg::Warn(format!("No partition defined in {}", doc.path)).print();
    }
    println!("  - found #{} partitions", map.len());

    println!("2. Resolve Addresses");
    let declared = args.dump.then(|| map.clone());
    partition::resolve_all(&mut map).map_err(|err| {
        let origin = map
            .get(err.partition())
            .and_then(|p| p.metadata.get(loader::ORIGIN))
            .cloned();
        Error::Resolve { err, origin }
    })?;
    if let Some(declared) = &declared {
        display::print_dump(declared, &map);
    }

    println!("3. Generate Headers");
    let mut files = emitter::headers(&documents, &map, &args.output)?;
    for warn in emitter::warnings(&documents, &files) {
        warn.print();
    }
    if let Some(path) = &args.map {
        files.push(emitter::Generated {
            path: path.into(),
            text: emitter::to_yaml(&map)?,
        });
    }
    for file in &files {
        println!("  > {}", file.path.display());
    }
    emitter::write(&files)
}
