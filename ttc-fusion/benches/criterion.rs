use criterion::{criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use ttc_core::{BoundingBox, DataFrame, KeyPoint, KeyPointMatch, RangePoint, Roi};
use ttc_fusion::{
    cluster_range_points, match_bounding_boxes, CameraTtcEstimator, LidarCameraProjection,
    LinkStrategy,
};

/// A KITTI sized frame with a dozen detections, a full point cloud and matched keypoints.
fn random_frame(rng: &mut Pcg64) -> DataFrame {
    let bounding_boxes = (0..12)
        .map(|id| {
            let x = rng.gen_range(0.0..1100.0);
            let y = rng.gen_range(100.0..300.0);
            BoundingBox::new(id, Roi::new(x, y, rng.gen_range(40.0..140.0), rng.gen_range(30.0..75.0)))
        })
        .collect();
    let range_points = (0..20_000)
        .map(|_| {
            RangePoint::new(
                rng.gen_range(4.0..40.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-1.7..1.0),
            )
        })
        .collect();
    let keypoints = (0..2000)
        .map(|_| KeyPoint::new(rng.gen_range(0.0..1242.0), rng.gen_range(0.0..375.0)))
        .collect();
    let matches = (0..2000).map(|ix| KeyPointMatch::new(ix, ix)).collect();
    DataFrame {
        bounding_boxes,
        keypoints,
        matches,
        range_points,
    }
}

fn cluster(c: &mut Criterion) {
    let mut rng = Pcg64::seed_from_u64(0);
    let frame = random_frame(&mut rng);
    let camera = LidarCameraProjection::kitti_2011_09_26();
    c.bench_function("cluster_range_points", |b| {
        b.iter(|| cluster_range_points(&camera, &mut frame.clone(), 0.1))
    });
}

fn link(c: &mut Criterion) {
    let mut rng = Pcg64::seed_from_u64(0);
    let previous = random_frame(&mut rng);
    let current = random_frame(&mut rng);
    c.bench_function("match_bounding_boxes", |b| {
        b.iter(|| {
            match_bounding_boxes(
                &current.matches,
                &previous,
                &current,
                25,
                LinkStrategy::BestPerPrevious,
            )
        })
    });
    c.bench_function("match_bounding_boxes_unique", |b| {
        b.iter(|| match_bounding_boxes(&current.matches, &previous, &current, 25, LinkStrategy::Unique))
    });
}

fn camera_ttc(c: &mut Criterion) {
    let mut rng = Pcg64::seed_from_u64(0);
    let previous: Vec<KeyPoint> = (0..300)
        .map(|_| KeyPoint::new(rng.gen_range(500.0..700.0), rng.gen_range(150.0..250.0)))
        .collect();
    let current: Vec<KeyPoint> = previous
        .iter()
        .map(|kp| KeyPoint(kp.0 * 1.01))
        .collect();
    let matches: Vec<KeyPointMatch> = (0..300).map(|ix| KeyPointMatch::new(ix, ix)).collect();
    let estimator = CameraTtcEstimator::new();
    c.bench_function("camera_ttc", |b| {
        b.iter(|| estimator.estimate(&previous, &current, &matches, 10.0))
    });
}

criterion_group!(
    name = fusion;
    config = Criterion::default().sample_size(10);
    targets = cluster, link, camera_ttc
);

criterion_main!(fusion);
