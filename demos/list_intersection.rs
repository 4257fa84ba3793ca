use chain_hash::intersection::connect_lists;
use chain_hash::intersection::create_list;
use chain_hash::intersection::intersection_node;
use chain_hash::intersection::render_list;
use clap::Parser;

/// Find the node where two singly linked lists meet.
#[derive(Parser, Debug)]
struct Args {
    /// Maximum number of nodes printed per list.
    #[arg(short = 'm', long = "max-nodes", default_value_t = 10)]
    max_nodes: usize,
}

struct Case {
    name: &'static str,
    a: &'static [i32],
    b: &'static [i32],
    intersect_val: Option<i32>,
}

const CASES: [Case; 5] = [
    Case {
        name: "Case 1: lists intersect",
        a: &[4, 1, 8, 4, 5],
        b: &[5, 6, 1, 8, 4, 5],
        intersect_val: Some(8),
    },
    Case {
        name: "Case 2: no intersection",
        a: &[2, 6, 4],
        b: &[1, 5],
        intersect_val: None,
    },
    Case {
        name: "Case 3: intersection at the head",
        a: &[3, 7, 1],
        b: &[3, 7, 1],
        intersect_val: Some(3),
    },
    Case {
        name: "Case 4: list B is empty",
        a: &[1, 2, 3],
        b: &[],
        intersect_val: None,
    },
    Case {
        name: "Case 5: different lengths with intersection",
        a: &[1, 9, 1, 2, 4],
        b: &[3, 2, 4],
        intersect_val: Some(2),
    },
];

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("LINKED LIST INTERSECTION");

    let mut failures = 0;
    for case in &CASES {
        println!("\n{}", case.name);

        let a = create_list(case.a);
        let b = match case.intersect_val {
            Some(val) => connect_lists(&a, case.b, val),
            None => create_list(case.b),
        };

        println!("List A: {}", render_list(&a, args.max_nodes));
        println!("List B: {}", render_list(&b, args.max_nodes));

        let found = intersection_node(&a, &b);
        match &found {
            Some(node) => println!("Intersection found at node with value: {}", node.val),
            None => println!("No intersection"),
        }

        let correct = match (case.intersect_val, &found) {
            (None, None) => true,
            (Some(val), Some(node)) => node.val == val,
            _ => false,
        };
        if correct {
            println!("OK");
        } else {
            println!("WRONG");
            failures += 1;
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
