use anyhow::Result;

fn main() -> Result<()> {
    go2md::main_entry()
}
