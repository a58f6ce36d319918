use crate::utils;
use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

fn bench_add(data: &[i64]) -> (BTreeMap<i64, i64>, Duration) {
    let mut m = BTreeMap::new();
    let begin = Instant::now();
    for k in data {
        m.insert(*k, *k);
    }
    (m, begin.elapsed())
}

fn bench_find(m: &BTreeMap<i64, i64>, d: &[i64]) -> Duration {
    let begin = Instant::now();
    for k in d {
        assert!(m.get(k).is_some());
    }
    begin.elapsed()
}

fn bench_remove(m: &mut BTreeMap<i64, i64>, d: &[i64]) -> Duration {
    let begin = Instant::now();
    for k in d {
        assert!(m.remove(k).is_some());
    }
    begin.elapsed()
}

pub(crate) fn run(data: &[i64]) {
    let (mut m, add) = bench_add(data);
    let find = bench_find(&m, data);
    let rm = bench_remove(&mut m, data);
    println!(
        "btm add: {:.1}ns, find: {:.1}ns, remove: {:.1}ns",
        utils::to_ns_per(add, data.len()),
        utils::to_ns_per(find, data.len()),
        utils::to_ns_per(rm, data.len())
    );
}
