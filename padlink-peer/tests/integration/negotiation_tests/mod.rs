mod test_negotiation_failures;
mod test_negotiation_ordering;
