use equisize::metrics::{cluster_sizes, size_spread};
use equisize::pipeline::{
    geocode_addresses, render, route_clusters, Palette, Renderer, RouteBounds, Router,
};
use equisize::{EqualSizeKmeans, Kmeans, SeedClusterer};
use ndarray::ArrayView1;
use std::collections::HashMap;

/// Nearest-neighbour tour starting at the first stop.
struct GreedyRouter;

impl Router for GreedyRouter {
    type Route = Vec<usize>;

    fn optimize(&self, stops: &[[f64; 2]]) -> equisize::Result<Vec<usize>> {
        let mut order = vec![0];
        let mut left: Vec<usize> = (1..stops.len()).collect();
        while !left.is_empty() {
            let here = stops[*order.last().unwrap_or(&0)];
            let (pos, _) = left
                .iter()
                .enumerate()
                .map(|(pos, &i)| {
                    let d = (stops[i][0] - here[0]).powi(2) + (stops[i][1] - here[1]).powi(2);
                    (pos, d)
                })
                .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best });
            order.push(left.remove(pos));
        }
        Ok(order)
    }
}

/// Counts points per colour instead of drawing a map.
#[derive(Default)]
struct Legend {
    counts: HashMap<String, usize>,
}

impl Renderer for Legend {
    fn draw(&mut self, _point: ArrayView1<'_, f64>, _label: usize, color: &str) {
        *self.counts.entry(color.to_string()).or_default() += 1;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A fake address book: 22 stops spread over three neighbourhoods, with
    // one neighbourhood much denser than the others, plus one bad address.
    let mut book: HashMap<String, (f64, f64)> = HashMap::new();
    let mut addresses = Vec::new();
    for i in 0..14 {
        let name = format!("{} Valley Rd", 100 + i);
        let lon = -111.40 + 0.002 * i as f64;
        let lat = 40.50 + 0.001 * (i % 3) as f64;
        book.insert(name.clone(), (lon, lat));
        addresses.push(name);
    }
    for i in 0..5 {
        let name = format!("{} Lake Dr", 10 + i);
        book.insert(name.clone(), (-111.50 + 0.003 * i as f64, 40.42));
        addresses.push(name);
    }
    for i in 0..3 {
        let name = format!("{} Ridge Ln", 7 + i);
        book.insert(name.clone(), (-111.35, 40.58 + 0.002 * i as f64));
        addresses.push(name);
    }
    addresses.push("nowhere in particular".to_string());

    let geocoder = |address: &str| book.get(address).copied();
    let geocoded = geocode_addresses(&geocoder, &addresses)?;
    println!(
        "geocoded {} of {} addresses (dropped rows {:?})",
        geocoded.points.len(),
        addresses.len(),
        geocoded.missing
    );

    let routes = 4;
    let plain = Kmeans::new(routes)
        .with_seed(2024)
        .fit(&geocoded.points, routes, None)?;
    let plain_sizes = cluster_sizes(&plain.labels, routes);
    println!(
        "plain k-means sizes:  {plain_sizes:?} (spread {})",
        size_spread(&plain_sizes)
    );

    let result = EqualSizeKmeans::new(routes)
        .with_rounds(10)
        .with_seed(2024)
        .fit_points(&geocoded.points)?;
    let sizes = result.cluster_sizes();
    println!(
        "equal-size sizes:     {sizes:?} (spread {})",
        size_spread(&sizes)
    );
    println!(
        "wcss plain={:.6} balanced={:.6}",
        plain.inertia,
        result.wcss()?
    );

    for route in route_clusters(&result, &GreedyRouter, RouteBounds::default())? {
        let names: Vec<&str> = route
            .stops
            .iter()
            .map(|&i| addresses[geocoded.rows[i]].as_str())
            .collect();
        match route.route {
            Ok(order) => {
                let tour: Vec<&str> = order.iter().map(|&s| names[s]).collect();
                println!("route {}: {}", route.cluster, tour.join(" -> "));
            }
            Err(e) => println!("route {}: skipped ({e})", route.cluster),
        }
    }

    let mut legend = Legend::default();
    render(&result, &Palette::dark2(), &mut legend);
    let mut colours: Vec<_> = legend.counts.into_iter().collect();
    colours.sort();
    for (colour, count) in colours {
        println!("{colour}: {count} stops");
    }

    Ok(())
}
