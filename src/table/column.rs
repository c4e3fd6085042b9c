use std::cmp::Ordering;

/// One column of a [`DataTable`](super::DataTable).
///
/// The accessor renders the cell text, which is also what filtering and
/// default sorting look at. Columns are neither sortable nor filterable
/// unless configured; they are hideable unless configured otherwise.
pub struct Column<R> {
    pub(crate) id: &'static str,
    pub(crate) header: &'static str,
    pub(crate) accessor: fn(&R) -> String,
    pub(crate) compare: Option<fn(&R, &R) -> Ordering>,
    pub(crate) sortable: bool,
    pub(crate) hideable: bool,
}

impl<R> Column<R> {
    pub fn new(id: &'static str, header: &'static str, accessor: fn(&R) -> String) -> Self {
        Self {
            id,
            header,
            accessor,
            compare: None,
            sortable: false,
            hideable: true,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Sort by `compare` instead of the rendered text. Implies sortable.
    pub fn sort_by(mut self, compare: fn(&R, &R) -> Ordering) -> Self {
        self.compare = Some(compare);
        self.sortable = true;
        self
    }

    pub fn always_visible(mut self) -> Self {
        self.hideable = false;
        self
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn header(&self) -> &'static str {
        self.header
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_hideable(&self) -> bool {
        self.hideable
    }

    pub fn render(&self, row: &R) -> String {
        (self.accessor)(row)
    }

    pub(crate) fn compare_rows(&self, a: &R, b: &R) -> Ordering {
        match self.compare {
            Some(compare) => compare(a, b),
            None => natural_cmp(
                &self.render(a).to_lowercase(),
                &self.render(b).to_lowercase(),
            ),
        }
    }
}

/// Text order where digit runs compare by numeric value, so `user9` sorts
/// before `user10`.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        let (Some(ca), Some(cb)) = (a.chars().next(), b.chars().next()) else {
            return a.len().cmp(&b.len());
        };

        if ca.is_ascii_digit() && cb.is_ascii_digit() {
            let (run_a, rest_a) = split_digits(a);
            let (run_b, rest_b) = split_digits(b);
            let (num_a, num_b) = (run_a.trim_start_matches('0'), run_b.trim_start_matches('0'));
            let order = num_a
                .len()
                .cmp(&num_b.len())
                .then_with(|| num_a.cmp(num_b))
                .then_with(|| run_a.len().cmp(&run_b.len()));
            if order != Ordering::Equal {
                return order;
            }
            (a, b) = (rest_a, rest_b);
        } else {
            if ca != cb {
                return ca.cmp(&cb);
            }
            (a, b) = (&a[ca.len_utf8()..], &b[cb.len_utf8()..]);
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}
