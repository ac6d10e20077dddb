//! # Platen CLI
//!
//! Usage:
//!   platen order.json -o exports/
//!   echo '{ ... }' | platen -o exports/
//!   platen order.json --layout two-column
//!   platen --example > order.json

use std::env;
use std::fs;
use std::io::{self, Read};

use platen::{export_pdf, BusinessConfig, LayoutProfile};

fn main() {
    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_order_json());
        return;
    }

    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .expect("Failed to read stdin");
        buf
    };

    // Parse output directory
    let out_dir = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| ".".to_string());

    // Parse optional layout override
    let override_profile = args.windows(2).find(|w| w[0] == "--layout").map(|w| {
        LayoutProfile::parse(&w[1]).unwrap_or_else(|| {
            eprintln!(
                "✗ Unknown layout '{}'. Expected one of: large-single, \
                 condensed-single, two-column, universal",
                w[1]
            );
            std::process::exit(1);
        })
    });

    let doc: platen::Document = match serde_json::from_str(&input) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("✗ Failed to parse document: {}", e);
            std::process::exit(1);
        }
    };
    let doc = doc.normalized();

    match export_pdf(&BusinessConfig::default(), &doc, override_profile, &out_dir) {
        Ok(saved) => {
            eprintln!("✓ Written {} bytes to {}", saved.bytes, saved.path.display());
        }
        Err(e) => {
            eprintln!("✗ Export failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn example_order_json() -> &'static str {
    r##"{
  "kind": "Invoice",
  "number": "100481",
  "party": {
    "name": "Green Villa Market",
    "address": "88 Atlantic Ave, Brooklyn NY 11201"
  },
  "issuedOn": "2025-11-03",
  "grandTotal": 48.15,
  "items": [
    { "product": "p-27", "name": "Okra-Indian", "quantity": 3, "unitPrice": 2.25, "total": 6.75 },
    { "product": "p-23", "name": "Lime", "quantity": 10, "unitPrice": 0.40, "total": 4.00 },
    { "product": "p-15", "name": "Ginger", "quantity": 2, "unitPrice": 3.10, "total": 6.20 },
    { "product": "p-38", "name": "Spinach Bunch", "quantity": 12, "unitPrice": 1.10, "total": 13.20 },
    { "product": "p-09", "name": "Dry Coconut (bag)", "quantity": 1, "unitPrice": 18.00, "total": 18.00 }
  ]
}
"##
}
