use std::fmt::Debug;

pub fn assert_vec_eq<T: PartialEq + Debug>(left: Vec<T>, right: Vec<T>) {
    assert_vecr_eq(&left, &right);
}

// Like assert_eq on the vecs, but points at the first differing index,
// which is much easier to read for vecs of big structs.
pub fn assert_vecr_eq<T: PartialEq + Debug>(left: &Vec<T>, right: &Vec<T>) {
    if left == right {
        return;
    }
    if left.len() != right.len() {
        eprintln!(
            "size of left ({}) != size of right ({})",
            left.len(),
            right.len()
        );
    }
    for (i, (l, r)) in std::iter::zip(left, right).enumerate() {
        if l != r {
            eprintln!("Mismatch at index {}:", i);
            eprintln!("left: {:#?} != right: {:#?}", l, r);
            break;
        }
    }
    panic!("left != right");
}
