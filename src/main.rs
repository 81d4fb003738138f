use anyhow::Result;

fn main() -> Result<()> {
    fieldbook::run()?;
    Ok(())
}
