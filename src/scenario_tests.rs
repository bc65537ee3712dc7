#[cfg(test)]
mod tests {
    use crate::cluster::{
        nearest_centroid, Clustering, InitAlgorithm, LloydKmeans, MiniBatchKmeans, TrainedKmeans,
    };
    use crate::{Error, Result};
    use ndarray::{array, Array2};

    fn eight_points() -> Array2<f64> {
        array![
            [1.0, 1.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [0.0, 0.0],
            [5.0, 5.0],
            [5.0, 6.0],
            [6.0, 5.0],
            [6.0, 6.0],
        ]
    }

    fn approx_eq(a: &Array2<f64>, b: &Array2<f64>, tol: f64) -> bool {
        a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tol)
    }

    fn assert_two_groups(centroids: &Array2<f64>, labels: &[usize], tol: f64) {
        let expect0 = array![[0.5, 0.5], [5.5, 5.5]];
        let expect1 = array![[5.5, 5.5], [0.5, 0.5]];
        assert!(
            approx_eq(centroids, &expect0, tol) || approx_eq(centroids, &expect1, tol),
            "centroids = {centroids}"
        );

        let split0 = [0, 0, 0, 0, 1, 1, 1, 1];
        let split1 = [1, 1, 1, 1, 0, 0, 0, 0];
        assert!(labels == split0 || labels == split1, "labels = {labels:?}");
    }

    /// Lowest-inertia model over several seeds. Diagonal ties in the
    /// eight-point set can trap a single run in a local optimum.
    fn best_of_seeds<F>(fit: F) -> Result<TrainedKmeans>
    where
        F: Fn(u64) -> Result<TrainedKmeans>,
    {
        let mut best: Option<(f64, TrainedKmeans)> = None;
        for seed in 0..8 {
            let model = fit(seed)?;
            let inertia = model
                .report()
                .and_then(|r| r.inertia)
                .unwrap_or(f64::INFINITY);
            if best.as_ref().map_or(true, |(b, _)| inertia < *b) {
                best = Some((inertia, model));
            }
        }
        best.map(|(_, m)| m).ok_or(Error::EmptyInput)
    }

    #[test]
    fn test_lloyd_scenario() -> Result<()> {
        let data = eight_points();
        for chunk_size in [1024, 2] {
            let model = best_of_seeds(|seed| {
                LloydKmeans::new(2)
                    .with_tol(1e-8)
                    .with_max_iter(10)
                    .with_chunk_size(chunk_size)
                    .with_init(InitAlgorithm::KmeansPlusPlus)
                    .with_seed(seed)
                    .fit(data.view())
            })?;

            let labels = model.predict(data.view())?;
            assert_two_groups(&model.centroids(), &labels, 1e-4);
        }
        Ok(())
    }

    #[test]
    fn test_minibatch_scenario() -> Result<()> {
        // Batch means drift with sampling noise, so the centroid check is
        // looser than for Lloyd.
        let data = eight_points();
        for chunk_size in [1024, 4] {
            let model = best_of_seeds(|seed| {
                MiniBatchKmeans::new(2)
                    .with_tol(1e-8)
                    .with_max_iter(200)
                    .with_max_no_improve(50)
                    .with_batch_size(256)
                    .with_chunk_size(chunk_size)
                    .with_seed(seed)
                    .fit(data.view())
            })?;

            let labels = model.predict(data.view())?;
            assert_two_groups(&model.centroids(), &labels, 0.25);
        }
        Ok(())
    }

    #[test]
    fn test_predict_agrees_with_nearest_centroid() -> Result<()> {
        let data = Array2::from_shape_fn((300, 4), |(i, j)| {
            let center = (i % 3) as f64 * 8.0;
            center + ((i * 31 + j * 7) % 13) as f64 * 0.2
        });

        let models = [
            LloydKmeans::new(3).with_seed(11).with_chunk_size(17).fit(data.view())?,
            MiniBatchKmeans::new(3)
                .with_seed(11)
                .with_batch_size(64)
                .with_chunk_size(9)
                .fit(data.view())?,
        ];

        for model in &models {
            let centroids = model.centroids();
            let labels = model.predict(data.view())?;
            for (i, &label) in labels.iter().enumerate() {
                let (expected, _) = nearest_centroid(data.row(i), centroids.view());
                assert_eq!(label, expected, "row {i}");
            }
        }
        Ok(())
    }

    #[test]
    fn test_trait_objects() -> Result<()> {
        let data = eight_points();
        let algorithms: Vec<Box<dyn Clustering>> = vec![
            Box::new(LloydKmeans::new(2).with_seed(3)),
            Box::new(MiniBatchKmeans::new(2).with_seed(3).with_batch_size(64)),
        ];

        for algorithm in &algorithms {
            assert_eq!(algorithm.n_clusters(), 2);
            let labels = algorithm.fit_predict(data.view())?;
            assert_eq!(labels.len(), 8);
            assert!(labels.iter().all(|&l| l < 2));

            // Seeded, so a second fit reproduces the same labels.
            let model = algorithm.fit(data.view())?;
            assert_eq!(model.predict(data.view())?, labels);
        }
        Ok(())
    }

    #[test]
    fn test_fit_on_wider_data_then_predict_narrower() {
        let data = eight_points();
        let model = LloydKmeans::new(2).with_seed(0).fit(data.view()).unwrap();
        let narrow = array![[1.0], [2.0]];
        assert_eq!(
            model.predict(narrow.view()),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_random_init_still_produces_k_centroids() -> Result<()> {
        let data = eight_points();
        let model = LloydKmeans::new(2)
            .with_init(InitAlgorithm::Random)
            .with_seed(21)
            .fit(data.view())?;

        assert_eq!(model.centroids().dim(), (2, 2));
        assert!(model.centroids().iter().all(|v| v.is_finite()));
        Ok(())
    }
}
