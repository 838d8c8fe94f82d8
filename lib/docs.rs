//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Boundaries and absorbing potentials](#boundaries-and-absorbing-potentials)
//! - [Time dependence](#time-dependence)
//! - [Parallel evaluation](#parallel-evaluation)
//!
//! # Background
//! A particle hopping between the sites of a regular lattice is described by a
//! wavefunction that assigns one complex amplitude *ψ*\[*x*\] to every site
//! *x* = (*x*₀, ..., *x*ₙ₋₁). In the tight-binding approximation only
//! nearest-neighbor hopping is kept, and the Hamiltonian reads
//! ```text
//! (H ψ)[x] = -Σ_a J_a (ψ[x + e_a] + ψ[x - e_a]) + V[x] ψ[x]
//! ```
//! where *e*ₐ is the unit step along axis *a*, *J*ₐ is the hopping amplitude
//! along that axis, and *V*\[*x*\] is an on-site potential. This is the
//! finite-difference form of the continuum operator -(*ħ*²/2*m*)∇² + *V* up to
//! a constant energy offset, with *J* = *ħ*²/(2*m* δ*x*²).
//!
//! On a periodic lattice of *N* sites along each axis the hopping part is
//! diagonal in the plane-wave basis, with the dispersion relation
//! ```text
//! ε(k) = -2 Σ_a J_a cos(k_a),   k_a = 2π m / N,  m ∊ {0, ..., N - 1}
//! ```
//! so that the band spans [-2 Σ *J*ₐ, 2 Σ *J*ₐ] and a uniform state is the
//! ground state with energy -2 Σ *J*ₐ.
//!
//! Amplitudes are stored flat in row-major order: for extents
//! (*n*₀, ..., *n*ₖ₋₁) the flat index of a coordinate is
//! ```text
//! i = Σ_a x_a s_a,   s_{k-1} = 1,  s_a = s_{a+1} n_{a+1}
//! ```
//! with the last axis varying fastest.
//!
//! # Boundaries and absorbing potentials
//! A hop past the edge of the lattice either wraps around (*periodic*) or is
//! dropped (*open*), the latter acting as an infinitely high wall at which
//! packets reflect. To simulate an unbounded lattice one instead lines the
//! edges with an imaginary potential *V* = -*iγ*, *γ* > 0. Under the
//! time-dependent Schrödinger equation
//! ```text
//! ∂ψ
//! -- = -i H ψ
//! ∂t
//! ```
//! the on-site part of such a term gives ∂*ψ*/∂*t* = -*γψ* inside the region,
//! so amplitude entering it decays as exp(-*γt*) and the total norm
//! Σ|*ψ*|² decreases. *H* is then non-Hermitian, and the loss of norm measures
//! the probability that has left the simulated region. A smooth ramp of *γ*
//! reflects less than a sharp step, at the cost of a wider absorbing layer.
//!
//! # Time dependence
//! Three explicit schemes advance *ψ* by a step δ*t*.
//!
//! The forward Euler step
//! ```text
//! ψ(t + δt) = ψ(t) - i δt H ψ(t)
//! ```
//! is first order. For an eigenstate with energy *E* the amplification factor
//! is 1 - *iE*δ*t*, with modulus √(1 + *E*²δ*t*²) > 1, so for Hermitian *H* the
//! norm grows by δ*t*²|*Hψ*|² every step and the scheme is unconditionally
//! unstable over long times. It is kept as the simplest reference.
//!
//! The classical fourth-order Runge-Kutta scheme evaluates *Hψ* four times per
//! step. Its amplification factor for *y* = *E*δ*t* satisfies
//! ```text
//! |R(iy)|² = 1 - y⁶/72 + y⁸/576
//! ```
//! so the norm is conserved to sixth order and slowly decays for
//! |*y*| < 2√2.
//!
//! The split-step (Strang) scheme factors the propagator as
//! ```text
//! exp(-i H δt) ≈ exp(-i V δt/2) exp(-i T δt) exp(-i V δt/2)
//! ```
//! with *T* the hopping part, which is applied exactly by taking *ψ* to
//! k-space with a FFT, multiplying by exp(-*iε*(*k*)δ*t*), and transforming
//! back. Each factor is unitary for real *V*, so the norm is conserved to
//! rounding error regardless of δ*t*; the splitting error is *O*(δ*t*³) per
//! step and vanishes when *V* = 0. The FFT requires periodic boundaries.
//! Imaginary potentials enter the potential factors as real exponentials
//! exp(-*γ* δ*t*/2) and absorb exactly as described above.
//!
//! # Parallel evaluation
//! All elementwise operations split the flat index range into contiguous,
//! disjoint chunks that are processed concurrently. Since every output site is
//! written by exactly one chunk, results do not depend on scheduling. Sums over
//! the lattice (norms and inner products) are formed sequentially within each
//! chunk and then over chunks in order. Floating-point addition is not
//! associative, so a different chunk count can change the last bits of a sum,
//! but a fixed chunk count gives bitwise identical results on every run.
