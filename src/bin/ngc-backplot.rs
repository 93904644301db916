use std::{env, fs, process};
use ngc_backplot::{backplot, parse::parse};

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (preprocess, filename) = match (args.next(), args.next()) {
        (Some(flag), Some(filename)) if flag == "--preprocess" => (true, filename),
        (Some(filename), None) => (false, filename),
        _ => {
            eprintln!("usage: ngc-backplot [--preprocess] FILE");
            process::exit(2);
        }
    };
    let input = match fs::read_to_string(&filename) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Cannot read {}: {}", filename, e);
            process::exit(1);
        }
    };

    if preprocess {
        print!("{}", parse(&input));
        return;
    }

    let plot = backplot(&input);
    for (primitive, path) in plot.geometry.paths() {
        println!("{:>5}  {:<5} {} points", primitive.lineno, primitive.kind, path.len());
    }
    if let Some((lo, hi)) = plot.geometry.bounds() {
        println!("bounds: ({}, {}, {}) - ({}, {}, {})", lo.x, lo.y, lo.z, hi.x, hi.y, hi.z);
    }
    println!("path length: {:.3}", plot.geometry.length());
    for (line, tool) in plot.tools.iter() {
        println!("tool {} at line {}", tool, line);
    }
    for diag in &plot.diagnostics {
        eprintln!("{}", diag);
    }
}
