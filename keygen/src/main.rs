// Generates an RSA key pair for the key server
use anyhow::{Context, Result};
use clap::Parser;
use common::crypto;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "keygen")]
#[command(about = "Generate an RSA key pair for the key server", long_about = None)]
struct Args {
    /// Modulus size in bits
    #[arg(long, default_value_t = crypto::RSA_KEY_SIZE)]
    bits: usize,

    /// Write public.pem and private.pem into this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("=== GENERATING RSA-{} KEYS ===\n", args.bits);

    let (public_pem, private_pem) = crypto::generate_rsa_keypair(args.bits)?;
    let public_key = crypto::parse_public_key(&public_pem)?;
    let public_base64 = crypto::public_key_to_base64_der(&public_key)?;

    println!("=== PUBLIC KEY (PEM) ===");
    println!("{}", public_pem);

    println!("=== PUBLIC KEY (base64 DER) ===");
    println!("{}\n", public_base64);

    println!("=== PRIVATE KEY (PKCS#8 PEM) ===");
    println!("{}", private_pem);

    if let Some(out_dir) = args.out_dir {
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;
        fs::write(out_dir.join("public.pem"), &public_pem)?;
        fs::write(out_dir.join("private.pem"), &private_pem)?;

        println!("\n=== INSTRUCTIONS ===");
        println!(
            "Point 'private_key_path' in key-server.toml at {}",
            out_dir.join("private.pem").display()
        );
    }

    Ok(())
}
