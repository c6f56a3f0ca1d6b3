use crate::domain::model::Position;
use crate::utils::error::{Result, RouteError};

/// 節點以 9 位 geohash 作為唯一識別
pub const GEOHASH_PRECISION: usize = 9;

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

const AVG_EARTH_RADIUS_KM: f64 = 6371.0088;
const KM_TO_NAUTICAL_MILES: f64 = 0.539956803;

pub fn geohash_encode(position: Position) -> String {
    geohash_encode_with_precision(position, GEOHASH_PRECISION)
}

pub fn geohash_encode_with_precision((lat, lon): Position, precision: usize) -> String {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);
    let mut hash = String::with_capacity(precision);
    let mut even_bit = true;
    let mut bit = 0;
    let mut idx = 0usize;

    while hash.len() < precision {
        // 偶數位元切經度，奇數位元切緯度
        let (range, value) = if even_bit {
            (&mut lon_range, lon)
        } else {
            (&mut lat_range, lat)
        };
        let mid = (range.0 + range.1) / 2.0;
        if value >= mid {
            idx = idx * 2 + 1;
            range.0 = mid;
        } else {
            idx *= 2;
            range.1 = mid;
        }
        even_bit = !even_bit;

        bit += 1;
        if bit == 5 {
            hash.push(BASE32[idx] as char);
            bit = 0;
            idx = 0;
        }
    }

    hash
}

/// 解碼為格子中心點，四捨五入到小數第六位
pub fn geohash_decode(hash: &str) -> Result<Position> {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);
    let mut even_bit = true;

    for ch in hash.bytes() {
        let idx = BASE32
            .iter()
            .position(|&b| b == ch.to_ascii_lowercase())
            .ok_or_else(|| {
                RouteError::data_corruption(format!("Invalid geohash '{}'.", hash))
            })?;
        for shift in (0..5).rev() {
            let bit_set = (idx >> shift) & 1 == 1;
            let range = if even_bit {
                &mut lon_range
            } else {
                &mut lat_range
            };
            let mid = (range.0 + range.1) / 2.0;
            if bit_set {
                range.0 = mid;
            } else {
                range.1 = mid;
            }
            even_bit = !even_bit;
        }
    }

    if hash.is_empty() {
        return Err(RouteError::data_corruption("Empty geohash."));
    }

    let lat = (lat_range.0 + lat_range.1) / 2.0;
    let lon = (lon_range.0 + lon_range.1) / 2.0;
    Ok((round6(lat), round6(lon)))
}

/// 大圓距離（海里）
pub fn distance_nm((lat1, lon1): Position, (lat2, lon2): Position) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * AVG_EARTH_RADIUS_KM * KM_TO_NAUTICAL_MILES * a.sqrt().asin()
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geohash_encode_known_value() {
        // 常見參考值
        assert_eq!(geohash_encode_with_precision((57.64911, 10.40744), 11), "u4pruydqqvj");
        assert_eq!(geohash_encode((31.143378, 121.805214)).len(), GEOHASH_PRECISION);
    }

    #[test]
    fn test_geohash_published_reference_values() {
        assert_eq!(geohash_encode_with_precision((42.6, -5.6), 5), "ezs42");
        assert_eq!(
            geohash_encode_with_precision((-25.382708, -49.265506), 12),
            "6gkzwgjzn820"
        );
        assert_eq!(geohash_decode("ezs42").unwrap(), (42.60498, -5.603027));
    }

    #[test]
    fn test_geohash_decode_stays_within_cell() {
        let position = (25.935064, 119.663272);
        let (lat, lon) = geohash_decode(&geohash_encode(position)).unwrap();
        assert!((lat - position.0).abs() < 0.0001);
        assert!((lon - position.1).abs() < 0.0001);
    }

    #[test]
    fn test_geohash_decode_rejects_invalid_characters() {
        assert!(geohash_decode("wtaq!").is_err());
        assert!(geohash_decode("").is_err());
        // a i l o 不屬於 geohash 字母表
        assert!(geohash_decode("wsaq").is_err());
    }

    #[test]
    fn test_distance_nm() {
        assert_eq!(distance_nm((10.0, 20.0), (10.0, 20.0)), 0.0);
        // 赤道上一度經度約 60 海里
        let one_degree = distance_nm((0.0, 0.0), (0.0, 1.0));
        assert!((one_degree - 60.04).abs() < 0.05, "got {}", one_degree);
    }
}
