use advertizer::policy::advertizer::{Advertisement, Advertizer};

fn main() {
    // Re-broadcast each pending entry twice
    let mut adv = Advertizer::new(2);

    adv.push(0u64, "zero");
    adv.push(1, "one");
    adv.push(2, "two");
    adv.push(3, "three");

    for _ in 0..6 {
        if let Some(a) = adv.advertize() {
            println!("{}: {}", a.id(), a.payload());
        }
    }

    // 1 has expired; pushing it again tracks it from round zero
    adv.push(1, "one again");

    while let Some(a) = adv.advertize() {
        match a {
            Advertisement::Repeat { id, payload, count } => {
                println!("{}: {} (advertized {}x)", id, payload, count);
            },
            Advertisement::Last { id, payload } => {
                println!("{}: {} (final)", id, payload);
            },
        }
    }

    println!("remaining: {}", adv.len());
}
