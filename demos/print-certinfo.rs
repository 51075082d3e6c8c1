use std::env;
use std::error::Error;
use std::io;
use svn_x509::{CertInfo, X509Certificate};

const PARSE_ERRORS_FATAL: bool = false;

fn print_error_chain(e: &dyn Error) {
    eprintln!("  Error: {}", e);
    let mut source = e.source();
    while let Some(e) = source {
        eprintln!("    caused by: {}", e);
        source = e.source();
    }
}

fn handle_certificate(file_name: &str, data: &[u8]) -> io::Result<()> {
    match X509Certificate::from_der(data) {
        Ok(cert) => {
            println!("{}", CertInfo::from_certificate(&cert));
            println!("Version: {}", cert.version().number());
            println!("Serial: {:02x?}", cert.raw_serial());
            Ok(())
        }
        Err(e) => {
            eprintln!("Could not decode DER data in file {}", file_name);
            print_error_chain(&e);
            if PARSE_ERRORS_FATAL {
                Err(io::Error::new(io::ErrorKind::Other, e))
            } else {
                Ok(())
            }
        }
    }
}

pub fn main() -> io::Result<()> {
    for file_name in env::args().skip(1) {
        println!("File: {}", file_name);
        let data = std::fs::read(&file_name)?;
        handle_certificate(&file_name, &data)?;
        println!();
    }
    Ok(())
}
