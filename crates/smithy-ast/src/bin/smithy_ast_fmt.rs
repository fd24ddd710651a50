//! `smithy-ast-fmt`: validate a Smithy JSON AST model and print it in
//! canonical form.
//!
//! Usage:
//!   smithy-ast-fmt [<model.json>]
//!
//! The model is read from the given path, or from stdin when no path is
//! given. On failure the error is printed as `<source>:<row>:<col>: <error>`
//! and the exit status is 1.

use smithy_ast::{write_model, Model, ReadOptions, Scanner};
use std::io::{self, Read, Write};

fn main() {
    let path = std::env::args().nth(1);

    let data = match &path {
        Some(p) => std::fs::read(p),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map(|_| buf)
        }
    };
    let data = match data {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let options = ReadOptions {
        path: path.clone(),
        ..ReadOptions::default()
    };
    let model = match Model::from_slice_with(&data, &options) {
        Ok(m) => m,
        Err(e) => {
            let source = path.as_deref().unwrap_or("<stdin>");
            match e.offset() {
                Some(offset) => {
                    let loc = Scanner::new(&data).location(offset);
                    eprintln!("{source}:{}:{}: {e}", loc.row, loc.col);
                }
                None => eprintln!("{source}: {e}"),
            }
            std::process::exit(1);
        }
    };

    let mut stdout = io::stdout().lock();
    let written = write_model(&model, &mut stdout).and_then(|()| stdout.write_all(b"\n"));
    if let Err(e) = written {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
