use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use designtml::{export_to_file, render, RenderOptions, Template};

fn usage() -> ! {
    eprintln!("Usage: designtml-render <template.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --export              use the minimal export shell (default: preview)");
    eprintln!("  --out <file>          write the document to <file> instead of stdout");
    eprintln!("  --source-image <url>  draw <url> behind the components");
    process::exit(2);
}

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let mut template_path: Option<PathBuf> = None;
    let mut out_path: Option<PathBuf> = None;
    let mut export = false;
    let mut source_image: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--export" => export = true,
            "--out" => match args.next() {
                Some(path) => out_path = Some(PathBuf::from(path)),
                None => usage(),
            },
            "--source-image" => match args.next() {
                Some(url) => source_image = Some(url),
                None => usage(),
            },
            "--help" | "-h" => usage(),
            _ if template_path.is_none() => template_path = Some(PathBuf::from(arg)),
            _ => usage(),
        }
    }

    let Some(template_path) = template_path else {
        usage();
    };

    let json = match fs::read_to_string(&template_path) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("error: cannot read {}: {}", template_path.display(), err);
            process::exit(1);
        }
    };

    let template = match Template::parse(&json) {
        Ok(template) => template,
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };

    let mut options = if export {
        RenderOptions::export()
    } else {
        RenderOptions::preview()
    };
    if let Some(url) = source_image {
        options = options.with_source_image(url);
    }

    match out_path {
        Some(path) => {
            if let Err(err) = export_to_file(&template, &options, &path) {
                eprintln!("error: {}", err);
                process::exit(1);
            }
            println!("wrote {}", path.display());
        }
        None => match render(&template, &options) {
            Ok(html) => print!("{}", html),
            Err(err) => {
                eprintln!("error: {}", err);
                process::exit(1);
            }
        },
    }
}
