//! Basic usage examples for scratch_pool

use scratch_pool::{ListPool, MapPool, ObjectPool, PoolConfiguration, TextPool};

fn main() {
    println!("=== scratch_pool - Basic Examples ===\n");

    // Example 1: Generic pool with a factory
    simple_pool();

    // Example 2: Bounded pool
    bounded_pool();

    // Example 3: Container pools
    container_pools();

    // Example 4: Metrics
    metrics();
}

fn simple_pool() {
    println!("1. Simple Pool:");
    let pool = ObjectPool::new(|| vec![0u8; 4], PoolConfiguration::default());

    {
        let buf = pool.rent_scoped();
        println!("   Got buffer: {:?}", *buf);
        // Buffer automatically returned when dropped
    }

    println!("   Idle after return: {}\n", pool.idle_count());
}

fn bounded_pool() {
    println!("2. Bounded Pool:");
    let pool = ObjectPool::new(String::new, PoolConfiguration::new().with_capacity_limit(2));

    for name in ["bow", "arrow", "quiver"] {
        pool.give_back(name.to_string());
    }

    println!("   Idle after three returns: {}", pool.idle_count());
    println!("   Destroyed: {}\n", pool.metrics().total_destroyed);
}

fn container_pools() {
    println!("3. Container Pools:");

    let lists = ListPool::new();
    let ids = lists.rent_from([7, 3, 9]);
    println!("   List: {:?}", ids);
    lists.give_back(ids);

    let maps = MapPool::new();
    match maps.rent_from([("ammo", 30), ("ammo", 60)]) {
        Ok(map) => println!("   Map: {:?}", map),
        Err(err) => println!("   Map rejected: {err}"),
    }

    let texts = TextPool::new();
    let mut line = texts.rent();
    line.push_str("stack of 64");
    println!("   Text: {}\n", texts.rent_and_release(line));
}

fn metrics() {
    println!("4. Metrics:");
    let pool = TextPool::new();

    for _ in 0..3 {
        let text = pool.rent();
        pool.give_back(text);
    }

    for (key, value) in pool.metrics().export() {
        println!("     {}: {}", key, value);
    }
}
