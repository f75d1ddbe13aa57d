use btc_core::config::Network;
use btc_wallet::Wallet;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "btc")]
#[command(about = "Bitcoin key/address toy CLI built on btc-core", version)]
struct Cli {
    /// Use testnet version bytes instead of mainnet.
    #[arg(long, global = true)]
    testnet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new private key and print its WIF and address.
    NewAddress {
        #[arg(long)]
        uncompressed: bool,
    },
    /// Derive the address for a WIF-encoded private key.
    AddressFromWif { wif: String },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let network = if cli.testnet { Network::Testnet } else { Network::Mainnet };

    let result = match cli.command {
        Commands::NewAddress { uncompressed } => {
            Wallet::generate(network, !uncompressed).map(|wallet| {
                println!("address: {}", wallet.address());
                println!("wif:     {}", wallet.to_wif());
            })
        }
        Commands::AddressFromWif { wif } => Wallet::from_wif(&wif).map(|wallet| {
            println!("address: {}", wallet.address());
        }),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
