//! Hand-written entities shared by the integration tests.
//!
//! `company` 1 --< `employee` (self-referencing `manager`), and the
//! `contracts_for` link table with a composite key referenced by `invoice`.

use typeq::prelude::*;
use typeq::Result;

// =============================================================================
// Company
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

impl Company {
    pub fn new(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompanyColumns {
    source: Source,
}

impl CompanyColumns {
    pub fn id(&self) -> Expr<i64> {
        self.source.column("id")
    }

    pub fn name(&self) -> Expr<String> {
        self.source.column("name")
    }

    pub fn employees(&self) -> Reverse<Employee> {
        self.source.reverse(&["id"], 0, &["company_id"])
    }

    pub fn contracts(&self) -> Reverse<ContractsFor> {
        self.source.reverse(&["id"], 1, &["company_id"])
    }
}

impl TableColumns for CompanyColumns {
    fn bind(source: Source) -> Self {
        Self { source }
    }

    fn source(&self) -> &Source {
        &self.source
    }
}

impl ResultMapper for CompanyColumns {
    type Output = Company;

    fn selections(&self) -> Vec<SQL> {
        self.source.columns(&["id", "name"])
    }

    fn convert(&self, row: &Row) -> Result<Company> {
        Ok(Company {
            id: self.source.get(row, "id")?,
            name: self.source.get(row, "name")?,
        })
    }
}

impl Entity for Company {
    type Columns = CompanyColumns;
    type Key = i64;

    fn descriptor() -> TableDescriptor {
        TableDescriptor::new("company")
            .with_column(ColumnDescriptor::new("id", ColumnType::BigInt).auto_increment())
            .with_column(ColumnDescriptor::new("name", ColumnType::Text))
            .with_primary_key(["id"])
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn split(&self) -> Vec<Value> {
        vec![self.id.to_value(), self.name.to_value()]
    }
}

// =============================================================================
// Employee
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub company: ForeignKey<Company>,
    pub manager: Option<ForeignKey<Employee>>,
    pub salary: i64,
}

impl Employee {
    pub fn new(name: &str, company: i64, manager: Option<i64>, salary: i64) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            company: ForeignKey::new(company),
            manager: manager.map(ForeignKey::new),
            salary,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmployeeColumns {
    source: Source,
}

impl EmployeeColumns {
    pub fn id(&self) -> Expr<i64> {
        self.source.column("id")
    }

    pub fn name(&self) -> Expr<String> {
        self.source.column("name")
    }

    pub fn salary(&self) -> Expr<i64> {
        self.source.column("salary")
    }

    pub fn manager_id(&self) -> Expr<Option<i64>> {
        self.source.column("manager_id")
    }

    pub fn company(&self) -> ForeignKeyField<Company> {
        self.source.foreign_key(0, &["company_id"])
    }

    pub fn manager(&self) -> ForeignKeyField<Employee> {
        self.source.nullable_foreign_key(1, &["manager_id"])
    }

    pub fn reports(&self) -> Reverse<Employee> {
        self.source.reverse(&["id"], 1, &["manager_id"])
    }

    pub fn contracts(&self) -> Reverse<ContractsFor> {
        self.source.reverse(&["id"], 0, &["employee_id"])
    }
}

impl TableColumns for EmployeeColumns {
    fn bind(source: Source) -> Self {
        Self { source }
    }

    fn source(&self) -> &Source {
        &self.source
    }
}

impl ResultMapper for EmployeeColumns {
    type Output = Employee;

    fn selections(&self) -> Vec<SQL> {
        self.source
            .columns(&["id", "name", "company_id", "manager_id", "salary"])
    }

    fn convert(&self, row: &Row) -> Result<Employee> {
        let manager: Option<i64> = self.source.get(row, "manager_id")?;
        Ok(Employee {
            id: self.source.get(row, "id")?,
            name: self.source.get(row, "name")?,
            company: ForeignKey::new(self.source.get(row, "company_id")?),
            manager: manager.map(ForeignKey::new),
            salary: self.source.get(row, "salary")?,
        })
    }

    fn foreign_key(&self, field: &FieldRef) -> Option<ForeignKeyLookup<Employee>> {
        match self.source.field_index(field)? {
            0 => Some(lookup(|e: &mut Employee| Some(e.company.slot()))),
            1 => Some(lookup(|e: &mut Employee| {
                e.manager.as_mut().map(|m| m.slot())
            })),
            _ => None,
        }
    }
}

impl Entity for Employee {
    type Columns = EmployeeColumns;
    type Key = i64;

    fn descriptor() -> TableDescriptor {
        TableDescriptor::new("employee")
            .with_column(ColumnDescriptor::new("id", ColumnType::BigInt).auto_increment())
            .with_column(ColumnDescriptor::new("name", ColumnType::Text))
            .with_column(ColumnDescriptor::new("company_id", ColumnType::BigInt).indexed())
            .with_column(ColumnDescriptor::new("manager_id", ColumnType::BigInt).nullable())
            .with_column(ColumnDescriptor::new("salary", ColumnType::BigInt))
            .with_primary_key(["id"])
            .with_foreign_key(
                ForeignKeyDescriptor::new::<Company>("company", ["company_id"])
                    .with_reverse("employees"),
            )
            .with_foreign_key(
                ForeignKeyDescriptor::new::<Employee>("manager", ["manager_id"])
                    .with_reverse("reports"),
            )
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn split(&self) -> Vec<Value> {
        vec![
            self.id.to_value(),
            self.name.to_value(),
            self.company.key().to_value(),
            self.manager.as_ref().map(|m| *m.key()).to_value(),
            self.salary.to_value(),
        ]
    }
}

// =============================================================================
// ContractsFor: composite primary key made of two foreign keys
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ContractsFor {
    pub employee: ForeignKey<Employee>,
    pub company: ForeignKey<Company>,
    pub role: String,
}

impl ContractsFor {
    pub fn new(employee: i64, company: i64, role: &str) -> Self {
        Self {
            employee: ForeignKey::new(employee),
            company: ForeignKey::new(company),
            role: role.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContractsForColumns {
    source: Source,
}

impl ContractsForColumns {
    pub fn role(&self) -> Expr<String> {
        self.source.column("role")
    }

    pub fn employee(&self) -> ForeignKeyField<Employee> {
        self.source.foreign_key(0, &["employee_id"])
    }

    pub fn company(&self) -> ForeignKeyField<Company> {
        self.source.foreign_key(1, &["company_id"])
    }

    pub fn invoices(&self) -> Reverse<Invoice> {
        self.source.reverse(
            &["employee_id", "company_id"],
            0,
            &["contract_employee", "contract_company"],
        )
    }
}

impl TableColumns for ContractsForColumns {
    fn bind(source: Source) -> Self {
        Self { source }
    }

    fn source(&self) -> &Source {
        &self.source
    }
}

impl ResultMapper for ContractsForColumns {
    type Output = ContractsFor;

    fn selections(&self) -> Vec<SQL> {
        self.source.columns(&["employee_id", "company_id", "role"])
    }

    fn convert(&self, row: &Row) -> Result<ContractsFor> {
        Ok(ContractsFor {
            employee: ForeignKey::new(self.source.get(row, "employee_id")?),
            company: ForeignKey::new(self.source.get(row, "company_id")?),
            role: self.source.get(row, "role")?,
        })
    }

    fn foreign_key(&self, field: &FieldRef) -> Option<ForeignKeyLookup<ContractsFor>> {
        match self.source.field_index(field)? {
            0 => Some(lookup(|c: &mut ContractsFor| Some(c.employee.slot()))),
            1 => Some(lookup(|c: &mut ContractsFor| Some(c.company.slot()))),
            _ => None,
        }
    }
}

impl Entity for ContractsFor {
    type Columns = ContractsForColumns;
    type Key = (i64, i64);

    fn descriptor() -> TableDescriptor {
        TableDescriptor::new("contracts_for")
            .with_column(ColumnDescriptor::new("employee_id", ColumnType::BigInt))
            .with_column(ColumnDescriptor::new("company_id", ColumnType::BigInt))
            .with_column(ColumnDescriptor::new("role", ColumnType::Text))
            .with_primary_key(["employee_id", "company_id"])
            .with_foreign_key(
                ForeignKeyDescriptor::new::<Employee>("employee", ["employee_id"])
                    .with_reverse("contracts"),
            )
            .with_foreign_key(
                ForeignKeyDescriptor::new::<Company>("company", ["company_id"])
                    .with_reverse("contracts"),
            )
    }

    fn key(&self) -> (i64, i64) {
        (*self.employee.key(), *self.company.key())
    }

    fn split(&self) -> Vec<Value> {
        vec![
            self.employee.key().to_value(),
            self.company.key().to_value(),
            self.role.to_value(),
        ]
    }
}

// =============================================================================
// Invoice: composite foreign key
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub contract: ForeignKey<ContractsFor>,
    pub amount: i64,
}

impl Invoice {
    pub fn new(employee: i64, company: i64, amount: i64) -> Self {
        Self {
            id: 0,
            contract: ForeignKey::new((employee, company)),
            amount,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InvoiceColumns {
    source: Source,
}

impl InvoiceColumns {
    pub fn id(&self) -> Expr<i64> {
        self.source.column("id")
    }

    pub fn amount(&self) -> Expr<i64> {
        self.source.column("amount")
    }

    pub fn contract(&self) -> ForeignKeyField<ContractsFor> {
        self.source
            .foreign_key(0, &["contract_employee", "contract_company"])
    }
}

impl TableColumns for InvoiceColumns {
    fn bind(source: Source) -> Self {
        Self { source }
    }

    fn source(&self) -> &Source {
        &self.source
    }
}

impl ResultMapper for InvoiceColumns {
    type Output = Invoice;

    fn selections(&self) -> Vec<SQL> {
        self.source
            .columns(&["id", "contract_employee", "contract_company", "amount"])
    }

    fn convert(&self, row: &Row) -> Result<Invoice> {
        let employee: i64 = self.source.get(row, "contract_employee")?;
        let company: i64 = self.source.get(row, "contract_company")?;
        Ok(Invoice {
            id: self.source.get(row, "id")?,
            contract: ForeignKey::new((employee, company)),
            amount: self.source.get(row, "amount")?,
        })
    }

    fn foreign_key(&self, field: &FieldRef) -> Option<ForeignKeyLookup<Invoice>> {
        match self.source.field_index(field)? {
            0 => Some(lookup(|i: &mut Invoice| Some(i.contract.slot()))),
            _ => None,
        }
    }
}

impl Entity for Invoice {
    type Columns = InvoiceColumns;
    type Key = i64;

    fn descriptor() -> TableDescriptor {
        TableDescriptor::new("invoice")
            .with_column(ColumnDescriptor::new("id", ColumnType::BigInt).auto_increment())
            .with_column(ColumnDescriptor::new("contract_employee", ColumnType::BigInt))
            .with_column(ColumnDescriptor::new("contract_company", ColumnType::BigInt))
            .with_column(ColumnDescriptor::new("amount", ColumnType::BigInt))
            .with_primary_key(["id"])
            .with_foreign_key(
                ForeignKeyDescriptor::new::<ContractsFor>(
                    "contract",
                    ["contract_employee", "contract_company"],
                )
                .with_reverse("invoices"),
            )
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn split(&self) -> Vec<Value> {
        let (employee, company) = *self.contract.key();
        vec![
            self.id.to_value(),
            employee.to_value(),
            company.to_value(),
            self.amount.to_value(),
        ]
    }
}
