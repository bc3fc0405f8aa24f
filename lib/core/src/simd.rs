// SIMD kernels for embedding math
// Dot product and squared Euclidean distance, the two reductions every
// similarity score and triplet distance is built from.
// Runtime dispatch: AVX2/FMA on x86_64, NEON on aarch64, scalar otherwise.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

// Below this length the dispatch overhead outweighs the vector lanes
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const MIN_DIM_SIZE_SIMD: usize = 16;

/// Dot product of two equal-length slices.
///
/// Callers are responsible for checking lengths; extra elements of the longer
/// slice are ignored.
#[inline]
pub fn dot_product_simd(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    let (a, b) = (&a[..len], &b[..len]);

    #[cfg(target_arch = "x86_64")]
    {
        if len >= MIN_DIM_SIZE_SIMD
            && is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
        {
            return unsafe { dot_product_avx2(a, b) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if len >= MIN_DIM_SIZE_SIMD && std::arch::is_aarch64_feature_detected!("neon") {
            return unsafe { dot_product_neon(a, b) };
        }
    }

    dot_product_scalar(a, b)
}

/// Squared Euclidean distance `||a - b||²` of two equal-length slices.
#[inline]
pub fn squared_l2_simd(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    let (a, b) = (&a[..len], &b[..len]);

    #[cfg(target_arch = "x86_64")]
    {
        if len >= MIN_DIM_SIZE_SIMD
            && is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
        {
            return unsafe { squared_l2_avx2(a, b) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if len >= MIN_DIM_SIZE_SIMD && std::arch::is_aarch64_feature_detected!("neon") {
            return unsafe { squared_l2_neon(a, b) };
        }
    }

    squared_l2_scalar(a, b)
}

/// L2 norm of a slice.
#[inline]
pub fn norm_simd(v: &[f32]) -> f32 {
    dot_product_simd(v, v).sqrt()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn horizontal_sum_avx(acc: __m256) -> f32 {
    let high = _mm256_extractf128_ps(acc, 1);
    let low = _mm256_castps256_ps128(acc);
    let mut sum = _mm_add_ps(high, low);
    sum = _mm_hadd_ps(sum, sum);
    sum = _mm_hadd_ps(sum, sum);
    _mm_cvtss_f32(sum)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn dot_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut i = 0;
    let mut acc0 = _mm256_setzero_ps();
    let mut acc1 = _mm256_setzero_ps();

    while i + 16 <= dim {
        let a0 = _mm256_loadu_ps(a.as_ptr().add(i));
        let b0 = _mm256_loadu_ps(b.as_ptr().add(i));
        let a1 = _mm256_loadu_ps(a.as_ptr().add(i + 8));
        let b1 = _mm256_loadu_ps(b.as_ptr().add(i + 8));
        acc0 = _mm256_fmadd_ps(a0, b0, acc0);
        acc1 = _mm256_fmadd_ps(a1, b1, acc1);
        i += 16;
    }

    let mut dot = horizontal_sum_avx(_mm256_add_ps(acc0, acc1));
    while i < dim {
        dot += a[i] * b[i];
        i += 1;
    }
    dot
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn squared_l2_avx2(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut i = 0;
    let mut acc0 = _mm256_setzero_ps();
    let mut acc1 = _mm256_setzero_ps();

    while i + 16 <= dim {
        let d0 = _mm256_sub_ps(
            _mm256_loadu_ps(a.as_ptr().add(i)),
            _mm256_loadu_ps(b.as_ptr().add(i)),
        );
        let d1 = _mm256_sub_ps(
            _mm256_loadu_ps(a.as_ptr().add(i + 8)),
            _mm256_loadu_ps(b.as_ptr().add(i + 8)),
        );
        acc0 = _mm256_fmadd_ps(d0, d0, acc0);
        acc1 = _mm256_fmadd_ps(d1, d1, acc1);
        i += 16;
    }

    let mut sum_sq = horizontal_sum_avx(_mm256_add_ps(acc0, acc1));
    while i < dim {
        let diff = a[i] - b[i];
        sum_sq += diff * diff;
        i += 1;
    }
    sum_sq
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
unsafe fn dot_product_neon(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut i = 0;
    let mut acc0 = vdupq_n_f32(0.0);
    let mut acc1 = vdupq_n_f32(0.0);

    while i + 8 <= dim {
        acc0 = vfmaq_f32(acc0, vld1q_f32(a.as_ptr().add(i)), vld1q_f32(b.as_ptr().add(i)));
        acc1 = vfmaq_f32(
            acc1,
            vld1q_f32(a.as_ptr().add(i + 4)),
            vld1q_f32(b.as_ptr().add(i + 4)),
        );
        i += 8;
    }

    let mut dot = vaddvq_f32(vaddq_f32(acc0, acc1));
    while i < dim {
        dot += a[i] * b[i];
        i += 1;
    }
    dot
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
unsafe fn squared_l2_neon(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut i = 0;
    let mut acc0 = vdupq_n_f32(0.0);
    let mut acc1 = vdupq_n_f32(0.0);

    while i + 8 <= dim {
        let d0 = vsubq_f32(vld1q_f32(a.as_ptr().add(i)), vld1q_f32(b.as_ptr().add(i)));
        let d1 = vsubq_f32(
            vld1q_f32(a.as_ptr().add(i + 4)),
            vld1q_f32(b.as_ptr().add(i + 4)),
        );
        acc0 = vfmaq_f32(acc0, d0, d0);
        acc1 = vfmaq_f32(acc1, d1, d1);
        i += 8;
    }

    let mut sum_sq = vaddvq_f32(vaddq_f32(acc0, acc1));
    while i < dim {
        let diff = a[i] - b[i];
        sum_sq += diff * diff;
        i += 1;
    }
    sum_sq
}

/// Scalar fallback, two accumulators for better pipelining
#[inline]
fn dot_product_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut acc0 = 0.0f32;
    let mut acc1 = 0.0f32;

    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let tail = a_chunks.remainder().len();

    for (x, y) in a_chunks.zip(b_chunks) {
        acc0 += x[0] * y[0] + x[1] * y[1];
        acc1 += x[2] * y[2] + x[3] * y[3];
    }

    let start = a.len() - tail;
    for i in start..a.len() {
        acc0 += a[i] * b[i];
    }

    acc0 + acc1
}

#[inline]
fn squared_l2_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut acc0 = 0.0f32;
    let mut acc1 = 0.0f32;

    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let tail = a_chunks.remainder().len();

    for (x, y) in a_chunks.zip(b_chunks) {
        let (d0, d1, d2, d3) = (x[0] - y[0], x[1] - y[1], x[2] - y[2], x[3] - y[3]);
        acc0 += d0 * d0 + d1 * d1;
        acc1 += d2 * d2 + d3 * d3;
    }

    let start = a.len() - tail;
    for i in start..a.len() {
        let diff = a[i] - b[i];
        acc0 += diff * diff;
    }

    acc0 + acc1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_dot_matches_naive_across_lengths() {
        for len in [0usize, 1, 3, 7, 16, 17, 33, 128, 130] {
            let a: Vec<f32> = (0..len).map(|i| (i as f32 * 0.37).sin()).collect();
            let b: Vec<f32> = (0..len).map(|i| (i as f32 * 0.11).cos()).collect();
            let expected = naive_dot(&a, &b);
            assert!((dot_product_simd(&a, &b) - expected).abs() < 1e-3, "len {len}");
        }
    }

    #[test]
    fn test_squared_l2_matches_naive() {
        for len in [2usize, 5, 16, 31, 128] {
            let a: Vec<f32> = (0..len).map(|i| i as f32 * 0.01).collect();
            let b: Vec<f32> = (0..len).map(|i| 1.0 - i as f32 * 0.02).collect();
            let expected: f32 = a.iter().zip(&b).map(|(x, y)| (x - y) * (x - y)).sum();
            assert!((squared_l2_simd(&a, &b) - expected).abs() < 1e-3, "len {len}");
        }
    }

    #[test]
    fn test_norm() {
        assert!((norm_simd(&[3.0, 4.0]) - 5.0).abs() < 1e-6);
        assert_eq!(norm_simd(&[]), 0.0);
    }
}
