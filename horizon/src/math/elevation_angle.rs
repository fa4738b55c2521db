use num_traits::Float;

/// Returns the up/down angle (in degrees) from a to b, where b is
/// `distance_m` away.
///
/// The line of sight is straight and the earth flat; neither
/// curvature nor refraction is accounted for.
pub fn elevation_angle<T>(start_elev_m: T, distance_m: T, end_elev_m: T) -> T
where
    T: Float,
{
    (end_elev_m - start_elev_m).atan2(distance_m).to_degrees()
}
