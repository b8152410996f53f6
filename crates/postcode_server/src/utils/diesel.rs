//! Generic utilities for working with diesel.

pub use crate::query;
use std::slice::Chunks;

pub const PG_MAX_PARAMS: usize = 65535;

/// Helper macro for implementing Queryable and Selectable and ensures the implementations match.
///
/// ```ignore
/// query! {
///     struct PrefectureRow {
///         code: String = prefectures::code,
///         name: String = prefectures::name,
///     }
/// }
/// ```
#[macro_export]
macro_rules! query {
    (
        $(#[ $attr:meta ])*
        $v:vis $kw:ident $name:ident {
            $(
                $fv:vis $field:ident: $t:ty = $table:ident :: $column:ident
            ),* $(,)?
        }
    ) => {
        $(#[ $attr ])*
        #[derive(::diesel::Queryable)]
        #[diesel(check_for_backend(::diesel::pg::Pg))]
        $v $kw $name {
            $($fv $field: $t),*
        }

        impl<DB: ::diesel::backend::Backend> ::diesel::Selectable<DB> for $name {
            type SelectExpression = ($( $crate::schema::$table::$column, )*);

            fn construct_selection() -> Self::SelectExpression {
                ($( $crate::schema::$table::$column, )*)
            }
        }
    };
}

/// Splits rows into chunks that stay under the bind parameter limit of Postgres
/// when each row binds `columns` parameters.
pub trait PostgresChunks<T> {
    fn pg_chunks(&self, columns: usize) -> Chunks<'_, T>;
}

impl<T> PostgresChunks<T> for [T] {
    fn pg_chunks(&self, columns: usize) -> Chunks<'_, T> {
        self.chunks(PG_MAX_PARAMS / columns.max(1))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chunks_under_param_limit() {
        let rows = vec![0u8; 40_000];
        let chunks = rows.pg_chunks(7).map(<[u8]>::len).collect::<Vec<_>>();
        assert_eq!(chunks, [9362, 9362, 9362, 9362, 2552]);
        assert!(chunks.iter().all(|len| len * 7 <= PG_MAX_PARAMS));
    }
}
