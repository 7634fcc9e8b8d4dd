//! Prime sizing for the backing store.

/// Returns true if `n` is prime.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut i = 3;
    // `i <= n / i` is `i * i <= n` without overflow.
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Smallest prime `>= n`, or `None` if it does not fit in `usize`.
pub fn next_prime(n: usize) -> Option<usize> {
    if n <= 2 {
        return Some(2);
    }
    let mut candidate = n | 1;
    while !is_prime(candidate) {
        candidate = candidate.checked_add(2)?;
    }
    Some(candidate)
}
