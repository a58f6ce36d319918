use crate::utils;
use pooled_avl::{Map, Result};
use std::time::{Duration, Instant};

fn bench_add(data: &[i64]) -> Result<(Map<i64, i64>, Duration)> {
    let mut m = Map::new(data.len())?;
    let begin = Instant::now();
    for k in data {
        m.insert(*k, *k)?;
    }
    Ok((m, begin.elapsed()))
}

fn bench_find(m: &Map<i64, i64>, d: &[i64]) -> Duration {
    let begin = Instant::now();
    for k in d {
        assert!(m.get(k).is_some());
    }
    begin.elapsed()
}

fn bench_remove(m: &mut Map<i64, i64>, d: &[i64]) -> Duration {
    let begin = Instant::now();
    for k in d {
        assert!(m.remove(k).is_some());
    }
    begin.elapsed()
}

// remove and reinsert every key, the pool never grows
fn bench_churn(m: &mut Map<i64, i64>, d: &[i64]) -> Result<Duration> {
    let begin = Instant::now();
    for k in d {
        m.remove(k);
        m.insert(*k, *k)?;
    }
    Ok(begin.elapsed())
}

pub(crate) fn run(data: &[i64]) -> Result<()> {
    let (mut m, add) = bench_add(data)?;
    let find = bench_find(&m, data);
    let churn = bench_churn(&mut m, data)?;
    let rm = bench_remove(&mut m, data);
    println!(
        "pool add: {:.1}ns, find: {:.1}ns, churn: {:.1}ns, remove: {:.1}ns",
        utils::to_ns_per(add, data.len()),
        utils::to_ns_per(find, data.len()),
        utils::to_ns_per(churn, data.len()),
        utils::to_ns_per(rm, data.len())
    );
    Ok(())
}
