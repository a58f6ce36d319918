use std::env;

mod btm;
mod pooled;
mod utils;

fn usage() {
    println!("usage: <pool|btm|all> <size>")
}

fn main() -> pooled_avl::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        usage();
        return Ok(());
    }
    let size = match args[2].parse::<usize>() {
        Ok(size) => size,
        Err(_) => {
            usage();
            return Ok(());
        }
    };
    let data = utils::randvec::<i64>(num_cpus::get(), size);
    match args[1].as_ref() {
        "pool" => pooled::run(&data)?,
        "btm" => btm::run(&data),
        "all" => {
            pooled::run(&data)?;
            btm::run(&data)
        }
        _ => usage(),
    }
    Ok(())
}
