use rand::Rng;
use std::{
    collections::HashSet,
    hash::Hash,
    mem,
    sync::mpsc::channel,
    thread,
    time::Duration,
};

pub(crate) trait Rand: Sized {
    fn rand<R: Rng>(r: &mut R) -> Self;
}

impl Rand for i64 {
    fn rand<R: Rng>(r: &mut R) -> Self {
        r.gen()
    }
}

pub(crate) fn random<T: Rand>() -> T {
    let mut rng = rand::thread_rng();
    T::rand(&mut rng)
}

/// `len` distinct random values, generated on `n` threads
pub(crate) fn randvec<T>(n: usize, len: usize) -> Vec<T>
where
    T: Eq + Hash + Rand + Send + 'static,
{
    let n = n.max(1);
    let csize = len / n;
    let (tx, rx) = channel();
    for _ in 0..n - 1 {
        let tx = tx.clone();
        thread::spawn(move || {
            let mut v: HashSet<T> = HashSet::with_capacity(csize);
            while v.len() < csize {
                v.insert(random());
            }
            tx.send(v).expect("randvec receiver dropped");
        });
    }
    mem::drop(tx);
    let mut v: HashSet<T> = HashSet::with_capacity(len);
    while v.len() < csize {
        v.insert(random());
    }
    while let Ok(c) = rx.recv() {
        v.extend(c)
    }
    while v.len() < len {
        v.insert(random());
    }
    v.into_iter().collect()
}

pub(crate) fn to_ns_per(t: Duration, n: usize) -> f64 {
    t.as_nanos() as f64 / n.max(1) as f64
}
