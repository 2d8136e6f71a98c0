//! formscan - print the forms found in an HTML file

use std::error::Error;
use std::path::PathBuf;

use formscan::{FormType, ScannerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut show_all = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--all" => show_all = true,
            _ => path = Some(PathBuf::from(arg)),
        }
    }
    let Some(path) = path else {
        eprintln!("usage: formscan [--all] <file.html>");
        std::process::exit(2);
    };

    let (doc, forms) = formscan::scan_file(&path)?;
    let config = ScannerConfig::default();
    let tree = doc.tree();

    let mut shown = 0;
    for form in forms.iter().filter(|f| show_all || config.is_relevant(f.form_type)) {
        shown += 1;
        let id = tree.get_attribute(form.root, "id").unwrap_or("-");
        let tag = tree.tag_name(form.root).unwrap_or("?");
        let mark = if form.form_type == FormType::Login { "*" } else { " " };
        println!("{mark} {} <{tag} id={id}>", form.form_type);
        for input in &form.inputs {
            let name = tree
                .get_attribute(input.element, "name")
                .or_else(|| tree.get_attribute(input.element, "id"))
                .unwrap_or("");
            println!(
                "    {:<16} <{}> {}",
                input.input_type.as_str(),
                tree.tag_name(input.element).unwrap_or("?"),
                name
            );
        }
    }

    if shown == 0 {
        println!("no forms found in {}", path.display());
    }
    Ok(())
}
