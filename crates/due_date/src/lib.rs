pub mod due_date_calculator;
