use math_maze_core::Point;
use math_maze_system_endpoint_selection::{EndpointChoice, EndpointSelector};
use math_maze_system_grid_generation::GridGenerator;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn five_by_five_lengths_are_in_range_or_fall_back_to_the_corner() {
    let mut generator = GridGenerator::new();
    let selector = EndpointSelector::new();
    let range = 3..=10;

    for seed in 0..64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let carving = generator.generate(5, 5, &mut rng);
        let selection = selector.select(carving.tree(), &range).expect("corner reachable");

        assert!(
            range.contains(&selection.path().len()) || selection.endpoint() == Point::new(4, 4),
            "seed {seed}: length {} ended at {}",
            selection.path().len(),
            selection.endpoint()
        );
    }
}

#[test]
fn selected_paths_are_contiguous_and_anchored() {
    let mut generator = GridGenerator::new();
    let selector = EndpointSelector::new();

    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let carving = generator.generate(15, 11, &mut rng);
        let selection = selector
            .select(carving.tree(), &(13..=40))
            .expect("corner reachable");
        let path = selection.path();

        assert_eq!(path.first(), Some(&Point::START));
        assert_eq!(path.last(), Some(&selection.endpoint()));
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
            assert_eq!(carving.grid().get(pair[1]), Some(&true));
        }
        if selection.choice() == EndpointChoice::Border {
            assert!(selection.endpoint().at_border(15, 11));
        }
    }
}

#[test]
fn border_endpoint_is_the_shortest_fitting_border_cell() {
    let mut generator = GridGenerator::new();
    let selector = EndpointSelector::new();
    let range = 12..=14;

    for seed in 0..32 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let carving = generator.generate(11, 11, &mut rng);
        let selection = selector.select(carving.tree(), &range).expect("corner reachable");
        if selection.choice() != EndpointChoice::Border {
            continue;
        }

        let shortest = carving
            .tree()
            .visited()
            .filter(|(point, node)| {
                point.at_border(11, 11) && range.contains(&(node.distance() as usize))
            })
            .map(|(_, node)| node.distance() as usize)
            .min();
        assert_eq!(shortest, Some(selection.path().len()));
    }
}

#[test]
fn path_reconstruction_is_deterministic() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xabc);
    let carving = GridGenerator::new().generate(11, 11, &mut rng);
    let selector = EndpointSelector::new();
    let corner = Point::new(10, 10);

    let first = selector.reconstruct_path(carving.tree(), corner).expect("reachable");
    let second = selector.reconstruct_path(carving.tree(), corner).expect("reachable");
    assert_eq!(first, second);
    assert_eq!(
        first.len(),
        carving.tree().distance(corner).expect("visited") as usize
    );
}
