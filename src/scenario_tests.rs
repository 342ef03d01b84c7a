#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::cluster::{balance, distance_matrix, update_centers, EqualSizeKmeans, SeedClusterer};
    use crate::metrics::{cluster_sizes, size_spread};
    use crate::{CenterSet, ClusterResult, Error, Kmeans, PointSet, Result};
    use proptest::prelude::*;

    fn six_points() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 0.0],
            vec![10.0, 1.0],
            vec![0.0, 10.0],
            vec![10.0, 10.0],
        ]
    }

    fn assert_centers_are_means(result: &ClusterResult) {
        let d = result.points.dim();
        for j in 0..result.centers.len() {
            let members = result.members(j);
            assert!(!members.is_empty());
            for c in 0..d {
                let mean = members
                    .iter()
                    .map(|&i| result.points.row(i)[c])
                    .sum::<f64>()
                    / members.len() as f64;
                assert!(
                    (result.centers.row(j)[c] - mean).abs() < 1e-9,
                    "center {j} coord {c}: {} vs {mean}",
                    result.centers.row(j)[c]
                );
            }
        }
    }

    #[test]
    fn test_six_points_three_clusters() -> Result<()> {
        let init = CenterSet::new(&[vec![0.0, 0.0], vec![10.0, 0.0], vec![5.0, 9.0]])?;
        let result = EqualSizeKmeans::new(3)
            .with_rounds(1)
            .with_seed(42)
            .with_initial_centers(init)
            .fit(&six_points())?;

        assert_eq!(result.labels(), &[0, 0, 1, 1, 2, 2]);
        assert_eq!(result.centers.row(0).to_vec(), vec![0.0, 0.5]);
        assert_eq!(result.centers.row(1).to_vec(), vec![10.0, 0.5]);
        assert_eq!(result.centers.row(2).to_vec(), vec![5.0, 10.0]);
        assert_eq!(result.quota, 2);
        assert_eq!(result.remainder, 0);
        Ok(())
    }

    #[test]
    fn test_six_points_cold_start_for_any_seed() -> Result<()> {
        // Most single k-means++ seedings of this layout settle in a worse
        // split, so the sweep asks for enough restarts to find the best one.
        for seed in 0..50 {
            let result = EqualSizeKmeans::new(3)
                .with_rounds(1)
                .with_n_init(100)
                .with_seed(seed)
                .fit(&six_points())?;
            assert_eq!(result.cluster_sizes(), vec![2, 2, 2], "seed {seed}");
            assert_centers_are_means(&result);

            let l = result.labels();
            assert!(
                l[0] == l[1] && l[2] == l[3] && l[4] == l[5],
                "seed {seed}: {l:?}"
            );
            let mut centers = result.centers.to_rows();
            centers.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(
                centers,
                vec![vec![0.0, 0.5], vec![5.0, 10.0], vec![10.0, 0.5]],
                "seed {seed}"
            );
        }
        Ok(())
    }

    #[test]
    fn test_six_points_sizes_with_default_restarts() -> Result<()> {
        for seed in 0..20 {
            let result = EqualSizeKmeans::new(3)
                .with_rounds(1)
                .with_seed(seed)
                .fit(&six_points())?;
            assert_eq!(result.cluster_sizes(), vec![2, 2, 2], "seed {seed}");
            assert_centers_are_means(&result);
        }
        Ok(())
    }

    #[test]
    fn test_seven_points_one_cluster_of_three() -> Result<()> {
        let data = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![5.0, 5.0],
            vec![6.0, 5.0],
            vec![0.0, 9.0],
            vec![1.0, 9.0],
            vec![3.0, 3.0],
        ];
        let result = EqualSizeKmeans::new(3)
            .with_rounds(4)
            .with_seed(17)
            .fit(&data)?;

        assert_eq!(result.quota, 2);
        assert_eq!(result.remainder, 1);
        let mut sizes = result.cluster_sizes();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![2, 2, 3]);
        assert_centers_are_means(&result);
        Ok(())
    }

    #[test]
    fn test_one_cluster_per_point() -> Result<()> {
        let data = vec![vec![1.0, 2.0], vec![-3.0, 0.5], vec![7.0, 7.0], vec![0.0, -4.0]];
        let result = EqualSizeKmeans::new(4)
            .with_rounds(3)
            .with_seed(5)
            .fit(&data)?;

        assert_eq!(result.cluster_sizes(), vec![1, 1, 1, 1]);
        for (i, point) in data.iter().enumerate() {
            let label = result.labels()[i];
            assert_eq!(&result.centers.row(label).to_vec(), point);
        }
        Ok(())
    }

    #[test]
    fn test_bad_cluster_count_rejected() {
        for k in [0, 7] {
            let err = EqualSizeKmeans::new(k).fit(&six_points()).unwrap_err();
            assert_eq!(
                err,
                Error::InvalidClusterCount {
                    requested: k,
                    n_items: 6
                }
            );
            assert!(err.is_invalid_configuration());
        }
    }

    #[test]
    fn test_same_seed_same_result() -> Result<()> {
        let data: Vec<Vec<f64>> = (0..40)
            .map(|i| {
                let t = i as f64;
                vec![(t * 1.7).sin() * 10.0, (t * 0.3).cos() * 10.0]
            })
            .collect();
        let model = EqualSizeKmeans::new(6).with_rounds(5).with_seed(99);

        let a = model.fit(&data)?;
        let b = model.fit(&data)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_fixed_point_keeps_assignment() -> Result<()> {
        let init = CenterSet::new(&[vec![0.0, 0.0], vec![10.0, 0.0], vec![5.0, 9.0]])?;
        let first = EqualSizeKmeans::new(3)
            .with_rounds(1)
            .with_seed(42)
            .with_initial_centers(init)
            .fit(&six_points())?;

        // Balancing against the round's own output reproduces it exactly.
        let points = &first.points;
        let again = balance(&distance_matrix(points, &first.centers)?)?;
        assert_eq!(again.assignment, first.assignment);
        let centers = update_centers(points, &again.assignment, &first.centers)?;
        assert_eq!(centers, first.centers);

        // Further rounds from the fixed point change nothing.
        let more = EqualSizeKmeans::new(3)
            .with_rounds(3)
            .with_seed(42)
            .with_initial_centers(first.centers.clone())
            .fit_points(points)?;
        assert_eq!(more.assignment, first.assignment);
        assert_eq!(more.centers, first.centers);
        Ok(())
    }

    #[test]
    fn test_custom_seed_backend() -> Result<()> {
        // Any backend works; here k-means with a different iteration budget.
        let points = PointSet::new(&six_points())?;
        let backend: &dyn SeedClusterer = &Kmeans::new(3).with_seed(8).with_max_iter(50);
        let result = EqualSizeKmeans::new(3)
            .with_rounds(2)
            .fit_with(&points, backend)?;
        assert_eq!(result.cluster_sizes(), vec![2, 2, 2]);
        assert!(result.model.iterations <= 50);
        Ok(())
    }

    #[test]
    fn test_balancing_evens_out_skewed_data() -> Result<()> {
        // A dense blob of 18 points and a sparse one of 2.
        let mut data: Vec<Vec<f64>> = (0..18)
            .map(|i| vec![(i % 6) as f64 * 0.1, (i / 6) as f64 * 0.1])
            .collect();
        data.push(vec![50.0, 50.0]);
        data.push(vec![51.0, 50.0]);

        let points = PointSet::new(&data)?;
        let plain = Kmeans::new(2).with_seed(4).fit(&points, 2, None)?;
        assert_eq!(size_spread(&cluster_sizes(&plain.labels, 2)), 16);

        let balanced = EqualSizeKmeans::new(2)
            .with_rounds(3)
            .with_seed(4)
            .fit_points(&points)?;
        assert_eq!(balanced.cluster_sizes(), vec![10, 10]);
        Ok(())
    }

    proptest! {
        #[test]
        fn pipeline_invariants(
            (n, k, flat) in (1usize..30)
                .prop_flat_map(|n| (Just(n), 1usize..=n))
                .prop_flat_map(|(n, k)| {
                    (Just(n), Just(k), proptest::collection::vec(-100.0f64..100.0, n * 2))
                }),
            rounds in 1usize..4,
            seed in 0u64..1000,
        ) {
            let data: Vec<Vec<f64>> = flat.chunks(2).map(|c| c.to_vec()).collect();
            let result = EqualSizeKmeans::new(k)
                .with_rounds(rounds)
                .with_seed(seed)
                .fit(&data)
                .unwrap();

            let q = n / k;
            let r = n % k;
            let sizes = result.cluster_sizes();

            // Every point labelled once.
            prop_assert_eq!(result.labels().len(), n);
            prop_assert_eq!(sizes.iter().sum::<usize>(), n);
            // Quota from round robin, leftovers on top.
            prop_assert!(sizes.iter().all(|&s| s >= q && s <= q + r));
            let over: usize = sizes.iter().map(|&s| s - q).sum();
            prop_assert_eq!(over, r);
            prop_assert_eq!(result.rounds_run, rounds);

            for j in 0..k {
                let members = result.members(j);
                for c in 0..2 {
                    let mean = members.iter().map(|&i| data[i][c]).sum::<f64>()
                        / members.len() as f64;
                    prop_assert!((result.centers.row(j)[c] - mean).abs() < 1e-9);
                }
            }
        }
    }
}
