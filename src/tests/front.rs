use crate::{advancing_front::AdvancingFront, idx::Idx};

fn front() -> AdvancingFront<f64> {
    AdvancingFront::new((Idx::new(10), -5.0), (Idx::new(0), 0.0), (Idx::new(11), 5.0), Idx::new(0), 8)
}

fn points(front: &AdvancingFront<f64>) -> Vec<usize> {
    front.iter().map(|ni| front.point(ni).usize()).collect()
}

#[test]
fn locate_node() {
    let mut front = front();
    let head = front.head();
    let middle = front.next(head).unwrap();

    assert_eq!(front.locate_node(-1.0), Some(head));
    assert_eq!(front.locate_node(0.0), Some(middle));
    assert_eq!(front.locate_node(4.9), Some(middle));
    // Searching backwards from the cached node
    assert_eq!(front.locate_node(-5.0), Some(head));
    // Outside the front
    assert_eq!(front.locate_node(5.0), None);
    assert_eq!(front.locate_node(-6.0), None);
}

#[test]
fn insert_and_remove() {
    let mut front = front();
    let middle = front.next(front.head()).unwrap();
    let n1 = front.insert_after(middle, Idx::new(1), 2.0).unwrap();
    let n2 = front.insert_after(n1, Idx::new(2), 3.0).unwrap();
    assert_eq!(points(&front), vec![10, 0, 1, 2, 11]);
    assert_eq!(front.locate_node(2.5), Some(n1));

    front.remove(n1).unwrap();
    assert_eq!(points(&front), vec![10, 0, 2, 11]);
    // The removed node still knows where it was
    assert_eq!(front.prev(n1), Some(middle));
    assert_eq!(front.next(n1), Some(n2));
    // and the cached search node moved off it
    assert_eq!(front.locate_node(2.5), Some(middle));

    assert!(front.remove(front.head()).is_err());
    assert!(front.insert_after(front.tail(), Idx::new(3), 6.0).is_err());
}

#[test]
fn locate_point() {
    let mut front = front();
    let middle = front.next(front.head()).unwrap();
    // Several nodes sharing one x value
    let n1 = front.insert_after(middle, Idx::new(1), 0.0).unwrap();
    let n2 = front.insert_after(n1, Idx::new(2), 0.0).unwrap();
    let n3 = front.insert_after(n2, Idx::new(3), 4.0).unwrap();

    assert_eq!(front.locate_point(Idx::new(2), 0.0), Some(n2));
    assert_eq!(front.locate_point(Idx::new(0), 0.0), Some(middle));
    assert_eq!(front.locate_point(Idx::new(3), 4.0), Some(n3));
    assert_eq!(front.locate_point(Idx::new(1), 0.0), Some(n1));
    assert_eq!(front.locate_point(Idx::new(10), -5.0), Some(front.head()));
    assert_eq!(front.locate_point(Idx::new(7), 1.0), None);
}
