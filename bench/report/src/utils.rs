use serde::Serializer;

pub(crate) fn round_float<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // Latencies are sub-millisecond, keep enough digits to stay meaningful.
    serializer.serialize_f64((value * 1e9).round() / 1e9)
}
