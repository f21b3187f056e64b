use anyhow::Result;

fn main() -> Result<()> {
    dossier_cli::main_entry()
}
