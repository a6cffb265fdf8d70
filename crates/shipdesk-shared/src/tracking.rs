use rand::Rng;

use crate::constants::TRACKING_DIGITS;

/// Build `<prefix><7-digit zero-padded random number>`.
///
/// No collision check is made against existing shipments.
pub fn generate_tracking_number<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    let n: u32 = rng.gen_range(0..10_000_000);
    format!("{prefix}{n:0width$}", width = TRACKING_DIGITS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let tn = generate_tracking_number("INT", &mut rng);
            assert_eq!(tn.len(), 3 + TRACKING_DIGITS);
            assert!(tn.starts_with("INT"));
            assert!(tn[3..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_zero_padding() {
        struct Zero;
        impl rand::RngCore for Zero {
            fn next_u32(&mut self) -> u32 {
                0
            }
            fn next_u64(&mut self) -> u64 {
                0
            }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill(0);
            }
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                dest.fill(0);
                Ok(())
            }
        }
        assert_eq!(generate_tracking_number("DEL", &mut Zero), "DEL0000000");
    }
}
